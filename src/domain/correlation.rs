//! Pearson correlation over timestamp-aligned series.
//!
//! Correlations are computed between a coin's close series and the USDT
//! dominance close series for the same timeframe, inner-joined on timestamp.

use chrono::NaiveDateTime;

/// Minimum aligned samples before a correlation is considered meaningful.
pub const DEFAULT_MIN_SAMPLES: usize = 7;

/// One correlation observation: a symbol against the dominance series on one
/// timeframe, dated at the last shared bar of the aligned window.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationRecord {
    pub timeframe: String,
    pub symbol: String,
    pub date: NaiveDateTime,
    pub correlation: f64,
}

/// Inner-join two time-ordered (timestamp, value) series on timestamp.
/// Non-finite values on either side are dropped.
pub fn align(
    a: &[(NaiveDateTime, f64)],
    b: &[(NaiveDateTime, f64)],
) -> Vec<(NaiveDateTime, f64, f64)> {
    let mut joined = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let (ta, va) = a[i];
        let (tb, vb) = b[j];
        if ta < tb {
            i += 1;
        } else if tb < ta {
            j += 1;
        } else {
            if va.is_finite() && vb.is_finite() {
                joined.push((ta, va, vb));
            }
            i += 1;
            j += 1;
        }
    }
    joined
}

/// Pearson correlation coefficient of two equal-length samples.
///
/// Fewer than two points, or zero variance in either sample, means the
/// coefficient is undefined; 0.0 is returned to signal "no detectable
/// relationship" rather than failing.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }

    let mean_x: f64 = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y: f64 = ys[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for k in 0..n {
        let dx = xs[k] - mean_x;
        let dy = ys[k] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }

    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Correlate one symbol's close series against the dominance close series.
/// Returns `None` when fewer than `min_samples` bars align.
pub fn correlate(
    symbol: &str,
    timeframe: &str,
    prices: &[(NaiveDateTime, f64)],
    dominance: &[(NaiveDateTime, f64)],
    min_samples: usize,
) -> Option<CorrelationRecord> {
    let joined = align(prices, dominance);
    if joined.len() < min_samples {
        return None;
    }

    let xs: Vec<f64> = joined.iter().map(|(_, x, _)| *x).collect();
    let ys: Vec<f64> = joined.iter().map(|(_, _, y)| *y).collect();

    Some(CorrelationRecord {
        timeframe: timeframe.to_string(),
        symbol: symbol.to_string(),
        date: joined.last().map(|(t, _, _)| *t)?,
        correlation: pearson(&xs, &ys),
    })
}
