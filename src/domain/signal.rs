//! Correlation-to-signal classification.

use std::fmt;
use std::str::FromStr;

/// Default classification threshold for the batch pipeline.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Directional trading signal derived from a correlation value.
///
/// A coin strongly negatively correlated with USDT dominance tends to rise
/// when dominance falls, hence `Long`; a strong positive correlation maps to
/// `Short`. Anything inside the threshold band carries no tradable edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Long,
    Short,
    Neutral,
}

impl Signal {
    pub fn is_tradable(self) -> bool {
        self != Signal::Neutral
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Long => write!(f, "long"),
            Signal::Short => write!(f, "short"),
            Signal::Neutral => write!(f, "neutral"),
        }
    }
}

impl FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "long" => Ok(Signal::Long),
            "short" => Ok(Signal::Short),
            "neutral" => Ok(Signal::Neutral),
            other => Err(format!("unknown signal: {other}")),
        }
    }
}

/// Classify a correlation value against a symmetric threshold.
pub fn classify(correlation: f64, threshold: f64) -> Signal {
    if correlation <= -threshold {
        Signal::Long
    } else if correlation >= threshold {
        Signal::Short
    } else {
        Signal::Neutral
    }
}

/// Confidence score of a classification: |correlation|, in [0, 1].
pub fn confidence(correlation: f64) -> f64 {
    correlation.abs()
}
