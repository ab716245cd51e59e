//! Market-wide risk signal from USDT dominance and breadth.
//!
//! High dominance means capital is parked in the stablecoin; low dominance
//! means it is deployed. Crossed with the average 24h move of the top coins
//! this gives a coarse regime read.

use std::fmt;

/// Dominance below this with a rising market reads bullish.
pub const BULLISH_DOMINANCE_BELOW: f64 = 4.0;
/// Dominance above this with a falling market reads bearish.
pub const BEARISH_DOMINANCE_ABOVE: f64 = 5.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketBias {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for MarketBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketBias::Bullish => write!(f, "bullish"),
            MarketBias::Bearish => write!(f, "bearish"),
            MarketBias::Neutral => write!(f, "neutral"),
        }
    }
}

/// Inputs and verdict of one risk-signal computation.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskReport {
    pub dominance_pct: f64,
    pub avg_change_pct: f64,
    pub coins_sampled: usize,
    pub bias: MarketBias,
}

impl RiskReport {
    pub fn new(dominance_pct: f64, avg_change_pct: f64, coins_sampled: usize) -> Self {
        Self {
            dominance_pct,
            avg_change_pct,
            coins_sampled,
            bias: market_bias(dominance_pct, avg_change_pct),
        }
    }
}

/// Classify the market regime. Both boundaries are strict inequalities.
pub fn market_bias(dominance_pct: f64, avg_change_pct: f64) -> MarketBias {
    if dominance_pct < BULLISH_DOMINANCE_BELOW && avg_change_pct > 0.0 {
        MarketBias::Bullish
    } else if dominance_pct > BEARISH_DOMINANCE_ABOVE && avg_change_pct < 0.0 {
        MarketBias::Bearish
    } else {
        MarketBias::Neutral
    }
}
