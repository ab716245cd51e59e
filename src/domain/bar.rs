//! Price bar representation.

use chrono::NaiveDateTime;

/// One OHLCV bar of a symbol at a given timeframe.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub symbol: String,
    pub timeframe: String,
    pub datetime: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Parse a bar timestamp. Intraday files carry full timestamps, daily and
/// weekly files may carry bare dates.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Canonical wire format for bar timestamps in output files.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Project a bar series onto its (datetime, close) points.
pub fn close_series(bars: &[PriceBar]) -> Vec<(NaiveDateTime, f64)> {
    bars.iter().map(|b| (b.datetime, b.close)).collect()
}
