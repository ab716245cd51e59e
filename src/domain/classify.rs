//! Entry/exit resolution for classified signals.
//!
//! Batch convention: a signal dated at bar N triggers at bar N+1's open and is
//! held for that single bar, exiting at its close. The signal only ever uses
//! information available at its own date. Take-profit and stop-loss levels are
//! informational at this resolution (only open/close are trusted intrabar), so
//! realized returns use the actual exit price.

use crate::domain::bar::PriceBar;
use crate::domain::correlation::CorrelationRecord;
use crate::domain::signal::{classify, confidence, Signal};

/// Default take-profit distance from entry, as a fraction.
pub const DEFAULT_TP_PCT: f64 = 0.02;
/// Default stop-loss distance from entry, as a fraction.
pub const DEFAULT_SL_PCT: f64 = 0.01;

/// A tradable signal with resolved price levels.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedSignal {
    pub timeframe: String,
    pub symbol: String,
    pub signal: Signal,
    pub confidence: f64,
    pub entry: f64,
    pub exit: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
}

/// Classify a correlation record and resolve its entry/exit against the
/// symbol's own price series.
///
/// Returns `None` when the signal is neutral, when no bar matches the record
/// date, or when the matching bar is the last one in the series. All three are
/// normal skips, not errors.
pub fn resolve(
    record: &CorrelationRecord,
    bars: &[PriceBar],
    threshold: f64,
    tp_pct: f64,
    sl_pct: f64,
) -> Option<ClassifiedSignal> {
    let signal = classify(record.correlation, threshold);
    if !signal.is_tradable() {
        return None;
    }

    let anchor = bars.iter().position(|b| b.datetime == record.date)?;
    let next = bars.get(anchor + 1)?;

    let entry = next.open;
    Some(ClassifiedSignal {
        timeframe: record.timeframe.clone(),
        symbol: record.symbol.clone(),
        signal,
        confidence: confidence(record.correlation),
        entry,
        exit: next.close,
        take_profit: entry * (1.0 + tp_pct),
        stop_loss: entry * (1.0 - sl_pct),
    })
}
