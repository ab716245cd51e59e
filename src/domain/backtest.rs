//! Trade simulation and per-timeframe aggregation.

use std::collections::BTreeMap;

use crate::domain::classify::ClassifiedSignal;
use crate::domain::signal::Signal;

/// A classified signal with its realized single-bar return.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeResult {
    pub signal: ClassifiedSignal,
    pub realized_return: f64,
}

/// Mean realized return per timeframe. Timeframes with no trades are absent.
/// BTreeMap keeps output ordering deterministic across runs.
pub type BacktestSummary = BTreeMap<String, f64>;

/// Realized return of one trade under its directional rule.
pub fn simulate_trade(signal: Signal, entry: f64, exit: f64) -> f64 {
    match signal {
        Signal::Long => (exit - entry) / entry,
        Signal::Short => (entry - exit) / entry,
        Signal::Neutral => 0.0,
    }
}

/// Simulate every classified signal.
pub fn run_backtest(signals: &[ClassifiedSignal]) -> Vec<TradeResult> {
    signals
        .iter()
        .map(|s| TradeResult {
            signal: s.clone(),
            realized_return: simulate_trade(s.signal, s.entry, s.exit),
        })
        .collect()
}

/// Arithmetic mean return per timeframe.
pub fn summarize(trades: &[TradeResult]) -> BacktestSummary {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for trade in trades {
        let entry = sums.entry(trade.signal.timeframe.clone()).or_insert((0.0, 0));
        entry.0 += trade.realized_return;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(tf, (sum, count))| (tf, sum / count as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_signal(timeframe: &str, signal: Signal, entry: f64, exit: f64) -> ClassifiedSignal {
        ClassifiedSignal {
            timeframe: timeframe.into(),
            symbol: "BTCUSDT".into(),
            signal,
            confidence: 0.5,
            entry,
            exit,
            take_profit: entry * 1.02,
            stop_loss: entry * 0.99,
        }
    }

    #[test]
    fn long_return() {
        assert_relative_eq!(simulate_trade(Signal::Long, 100.0, 110.0), 0.10);
    }

    #[test]
    fn short_return() {
        assert_relative_eq!(simulate_trade(Signal::Short, 100.0, 90.0), 0.10);
    }

    #[test]
    fn flat_exit_is_zero_either_direction() {
        assert_eq!(simulate_trade(Signal::Long, 100.0, 100.0), 0.0);
        assert_eq!(simulate_trade(Signal::Short, 100.0, 100.0), 0.0);
    }

    #[test]
    fn neutral_is_zero() {
        assert_eq!(simulate_trade(Signal::Neutral, 100.0, 150.0), 0.0);
    }

    #[test]
    fn losing_trades_go_negative() {
        assert!(simulate_trade(Signal::Long, 100.0, 95.0) < 0.0);
        assert!(simulate_trade(Signal::Short, 100.0, 105.0) < 0.0);
    }

    #[test]
    fn summarize_means_per_timeframe() {
        let signals = vec![
            make_signal("1d", Signal::Long, 100.0, 110.0),
            make_signal("1d", Signal::Long, 100.0, 90.0),
            make_signal("4h", Signal::Short, 100.0, 90.0),
        ];
        let summary = summarize(&run_backtest(&signals));

        assert_eq!(summary.len(), 2);
        assert_relative_eq!(summary["1d"], 0.0);
        assert_relative_eq!(summary["4h"], 0.10);
    }

    #[test]
    fn empty_timeframes_are_absent_not_zero() {
        let summary = summarize(&[]);
        assert!(summary.is_empty());
    }

    #[test]
    fn summary_iterates_in_timeframe_order() {
        let signals = vec![
            make_signal("4h", Signal::Long, 100.0, 101.0),
            make_signal("15m", Signal::Long, 100.0, 101.0),
            make_signal("1d", Signal::Long, 100.0, 101.0),
        ];
        let summary = summarize(&run_backtest(&signals));
        let keys: Vec<&String> = summary.keys().collect();
        assert_eq!(keys, vec!["15m", "1d", "4h"]);
    }
}
