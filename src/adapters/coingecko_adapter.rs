//! CoinGecko market-data adapter.
//!
//! Blocking client; the whole crate is synchronous batch work. Responses are
//! deserialized into typed records at this boundary so the domain never sees
//! raw JSON.

use crate::domain::error::PipelineError;
use crate::domain::market::{CoinMarket, MarketChart};
use crate::ports::market_data_port::MarketDataPort;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko caps market pages at 250 rows.
const PAGE_SIZE: usize = 250;

pub struct CoinGeckoAdapter {
    base_url: String,
    http: Client,
}

#[derive(Deserialize)]
struct GlobalResponse {
    data: GlobalData,
}

#[derive(Deserialize)]
struct GlobalData {
    market_cap_percentage: HashMap<String, f64>,
}

#[derive(Deserialize)]
struct MarketChartResponse {
    #[serde(default)]
    prices: Vec<[f64; 2]>,
    #[serde(default)]
    market_caps: Vec<[f64; 2]>,
}

fn chart_points(raw: Vec<[f64; 2]>) -> Vec<(i64, f64)> {
    raw.into_iter().map(|[ts, v]| (ts as i64, v)).collect()
}

/// Accumulate pages (numbered from 1) until `limit` rows are collected or a
/// page comes back empty, then truncate to `limit`.
fn collect_pages(
    limit: usize,
    mut fetch_page: impl FnMut(usize) -> Result<Vec<CoinMarket>, PipelineError>,
) -> Result<Vec<CoinMarket>, PipelineError> {
    let mut coins = Vec::with_capacity(limit);
    let mut page = 1;
    while coins.len() < limit {
        let batch = fetch_page(page)?;
        if batch.is_empty() {
            break;
        }
        coins.extend(batch);
        page += 1;
    }
    coins.truncate(limit);
    Ok(coins)
}

impl CoinGeckoAdapter {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PipelineError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PipelineError::Http {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, PipelineError> {
        let resp = self
            .http
            .get(url)
            .send()
            .map_err(|e| PipelineError::Http {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(PipelineError::Api {
                reason: format!("HTTP {status}: {body}"),
            });
        }

        resp.json().map_err(|e| PipelineError::Api {
            reason: format!("response decode error: {e}"),
        })
    }
}

impl MarketDataPort for CoinGeckoAdapter {
    fn global_dominance(&self, symbol: &str) -> Result<f64, PipelineError> {
        let url = format!("{}/global", self.base_url);
        let global: GlobalResponse = self.get_json(&url)?;
        global
            .data
            .market_cap_percentage
            .get(symbol)
            .copied()
            .ok_or_else(|| PipelineError::Api {
                reason: format!("no market_cap_percentage entry for {symbol}"),
            })
    }

    fn top_coins(&self, limit: usize) -> Result<Vec<CoinMarket>, PipelineError> {
        collect_pages(limit, |page| {
            let url = format!(
                "{}/coins/markets?vs_currency=usd&order=market_cap_desc&per_page={}&page={}",
                self.base_url, PAGE_SIZE, page
            );
            self.get_json(&url)
        })
    }

    fn market_chart(
        &self,
        coin_id: &str,
        days: u32,
        interval: Option<&str>,
    ) -> Result<MarketChart, PipelineError> {
        let mut url = format!(
            "{}/coins/{}/market_chart?vs_currency=usd&days={}",
            self.base_url, coin_id, days
        );
        if let Some(interval) = interval {
            url.push_str(&format!("&interval={interval}"));
        }
        let chart: MarketChartResponse = self.get_json(&url)?;
        Ok(MarketChart {
            prices: chart_points(chart.prices),
            market_caps: chart_points(chart.market_caps),
        })
    }
}
