//! Typed records for market-data API responses.
//!
//! API rows are resolved into these types once at the adapter boundary;
//! nothing downstream does ad hoc key lookups.

use serde::Deserialize;

/// One row of a top-N markets listing. Fields the API may omit are optional
/// and stay optional until a consumer decides a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

/// Price and market-cap history for one coin, as parallel
/// (unix-millis, value) series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketChart {
    pub prices: Vec<(i64, f64)>,
    pub market_caps: Vec<(i64, f64)>,
}

/// Mean 24h price change across market rows, ignoring rows where the API
/// omitted the field. Empty input yields 0.0.
pub fn average_change_24h(coins: &[CoinMarket]) -> f64 {
    let changes: Vec<f64> = coins
        .iter()
        .filter_map(|c| c.price_change_percentage_24h)
        .collect();
    if changes.is_empty() {
        return 0.0;
    }
    changes.iter().sum::<f64>() / changes.len() as f64
}
