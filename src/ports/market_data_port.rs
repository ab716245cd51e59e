//! Live market-data port trait.
//!
//! Adapters return typed `Result`s; the degrade-to-empty policy lives with
//! the consumers, which log and substitute 0.0/empty so a failed fetch stays
//! distinguishable from a successful fetch of nothing.

use crate::domain::error::PipelineError;
use crate::domain::market::{CoinMarket, MarketChart};

pub trait MarketDataPort {
    /// Current dominance percentage of `symbol` in total tracked market cap.
    fn global_dominance(&self, symbol: &str) -> Result<f64, PipelineError>;

    /// Top `limit` coins by market cap, paging through the API as needed.
    fn top_coins(&self, limit: usize) -> Result<Vec<CoinMarket>, PipelineError>;

    /// Price and market-cap history for one coin over `days`, optionally at a
    /// fixed interval (e.g. "daily").
    fn market_chart(
        &self,
        coin_id: &str,
        days: u32,
        interval: Option<&str>,
    ) -> Result<MarketChart, PipelineError>;
}
