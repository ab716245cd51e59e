//! Live single-coin analyzer.
//!
//! Works on chart series straight from the market-data API rather than stored
//! bars. Correlations are computed on strided simple returns, and entry/exit
//! uses a lookback window: entry `step` points back, exit at the latest point.
//! This is a deliberately different convention from the batch pipeline's
//! next-bar-open/close and the two are never mixed within one run.

use crate::domain::correlation::pearson;
use crate::domain::signal::{classify, confidence, Signal};

/// Default classification threshold for the live analyzer. More sensitive
/// than the batch pipeline: live reads trade on weaker evidence.
pub const DEFAULT_THRESHOLD: f64 = 0.2;

/// Timeframes the analyzer reports on. Intraday charts come back at 5-minute
/// resolution, daily charts at one point per day, so the step is the
/// timeframe duration over the chart resolution.
pub const TIMEFRAMES: [AnalyzerTimeframe; 4] = [
    AnalyzerTimeframe { label: "15m", chart: ChartKind::Intraday, step: 3 },
    AnalyzerTimeframe { label: "2h", chart: ChartKind::Intraday, step: 24 },
    AnalyzerTimeframe { label: "1d", chart: ChartKind::Daily, step: 1 },
    AnalyzerTimeframe { label: "1wk", chart: ChartKind::Daily, step: 7 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// 2-day chart at 5-minute resolution.
    Intraday,
    /// 30-day chart at daily resolution.
    Daily,
}

#[derive(Debug, Clone, Copy)]
pub struct AnalyzerTimeframe {
    pub label: &'static str,
    pub chart: ChartKind,
    pub step: usize,
}

/// One analyzer row: a timeframe's correlation, classification, and lookback
/// entry/exit. Entry/exit are `None` when the chart is too short.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinAnalysis {
    pub timeframe: &'static str,
    pub correlation: f64,
    pub confidence: f64,
    pub signal: Signal,
    pub entry: Option<f64>,
    pub exit: Option<f64>,
}

/// Simple returns with stride `step`, skipping zero denominators.
pub fn step_returns(series: &[(i64, f64)], step: usize) -> Vec<f64> {
    let mut out = Vec::new();
    for i in step..series.len() {
        let prev = series[i - step].1;
        if prev != 0.0 {
            out.push((series[i].1 - prev) / prev);
        }
    }
    out
}

/// Correlation between coin returns and dominance returns at a given stride.
/// Fewer than two paired returns → 0.0.
pub fn correlation_for_step(
    prices: &[(i64, f64)],
    dominance: &[(i64, f64)],
    step: usize,
) -> f64 {
    let pr = step_returns(prices, step);
    let dr = step_returns(dominance, step);
    let n = pr.len().min(dr.len());
    if n < 2 {
        return 0.0;
    }
    pearson(&pr[..n], &dr[..n])
}

/// Lookback entry/exit: entry `step` points before the latest point, exit at
/// the latest point. Series shorter than step+1 has no defined window.
pub fn entry_exit(prices: &[(i64, f64)], step: usize) -> Option<(f64, f64)> {
    if prices.len() < step + 1 {
        return None;
    }
    let entry = prices[prices.len() - 1 - step].1;
    let exit = prices[prices.len() - 1].1;
    Some((entry, exit))
}

/// Approximate USDT dominance percentage from three market-cap series.
/// Series are truncated to the common length; a zero combined cap yields 0.0.
pub fn dominance_series(
    usdt_caps: &[(i64, f64)],
    btc_caps: &[(i64, f64)],
    eth_caps: &[(i64, f64)],
) -> Vec<(i64, f64)> {
    let len = usdt_caps.len().min(btc_caps.len()).min(eth_caps.len());
    (0..len)
        .map(|i| {
            let (ts, usdt) = usdt_caps[i];
            let total = usdt + btc_caps[i].1 + eth_caps[i].1;
            let dom = if total != 0.0 { usdt / total * 100.0 } else { 0.0 };
            (ts, dom)
        })
        .collect()
}

/// Analyze one chart pairing for a single timeframe.
pub fn analyze_timeframe(
    tf: &AnalyzerTimeframe,
    prices: &[(i64, f64)],
    dominance: &[(i64, f64)],
    threshold: f64,
) -> CoinAnalysis {
    let correlation = correlation_for_step(prices, dominance, tf.step);
    let (entry, exit) = match entry_exit(prices, tf.step) {
        Some((e, x)) => (Some(e), Some(x)),
        None => (None, None),
    };
    CoinAnalysis {
        timeframe: tf.label,
        correlation,
        confidence: confidence(correlation),
        signal: classify(correlation, threshold),
        entry,
        exit,
    }
}
