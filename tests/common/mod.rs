#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use domsig::domain::backtest::{BacktestSummary, TradeResult};
use domsig::domain::classify::ClassifiedSignal;
use domsig::domain::correlation::CorrelationRecord;
use domsig::domain::error::PipelineError;
pub use domsig::domain::bar::PriceBar;
use domsig::domain::market::{CoinMarket, MarketChart};
use domsig::ports::data_port::DataPort;
use domsig::ports::market_data_port::MarketDataPort;
use domsig::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub series: HashMap<(String, String), Vec<PriceBar>>,
    pub dominance: HashMap<String, Vec<PriceBar>>,
    pub correlations: Option<Vec<CorrelationRecord>>,
    pub classifications: Option<Vec<ClassifiedSignal>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            series: HashMap::new(),
            dominance: HashMap::new(),
            correlations: None,
            classifications: None,
        }
    }

    pub fn with_series(mut self, symbol: &str, timeframe: &str, bars: Vec<PriceBar>) -> Self {
        self.series
            .insert((symbol.to_string(), timeframe.to_string()), bars);
        self
    }

    pub fn with_dominance(mut self, timeframe: &str, bars: Vec<PriceBar>) -> Self {
        self.dominance.insert(timeframe.to_string(), bars);
        self
    }

    pub fn with_correlations(mut self, records: Vec<CorrelationRecord>) -> Self {
        self.correlations = Some(records);
        self
    }

    pub fn with_classifications(mut self, signals: Vec<ClassifiedSignal>) -> Self {
        self.classifications = Some(signals);
        self
    }
}

impl DataPort for MockDataPort {
    fn load_series(&self, symbol: &str, timeframe: &str) -> Result<Vec<PriceBar>, PipelineError> {
        self.series
            .get(&(symbol.to_string(), timeframe.to_string()))
            .cloned()
            .ok_or_else(|| PipelineError::NoData {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            })
    }

    fn load_dominance(&self, timeframe: &str) -> Result<Vec<PriceBar>, PipelineError> {
        self.dominance
            .get(timeframe)
            .cloned()
            .ok_or_else(|| PipelineError::MissingDominance {
                timeframe: timeframe.to_string(),
            })
    }

    fn list_symbols(&self, timeframe: &str) -> Result<Vec<String>, PipelineError> {
        let mut symbols: Vec<String> = self
            .series
            .keys()
            .filter(|(_, tf)| tf == timeframe)
            .map(|(symbol, _)| symbol.clone())
            .collect();
        symbols.sort();
        Ok(symbols)
    }

    fn load_correlations(&self) -> Result<Option<Vec<CorrelationRecord>>, PipelineError> {
        Ok(self.correlations.clone())
    }

    fn load_classifications(&self) -> Result<Option<Vec<ClassifiedSignal>>, PipelineError> {
        Ok(self.classifications.clone())
    }
}

/// Report port that records every write in memory.
#[derive(Default)]
pub struct RecordingReportPort {
    pub correlations: RefCell<HashMap<String, Vec<CorrelationRecord>>>,
    pub correlation_summary: RefCell<Option<Vec<CorrelationRecord>>>,
    pub classifications: RefCell<Option<Vec<ClassifiedSignal>>>,
    pub backtest: RefCell<Option<(Vec<TradeResult>, BacktestSummary)>>,
}

impl ReportPort for RecordingReportPort {
    fn write_correlations(
        &self,
        timeframe: &str,
        records: &[CorrelationRecord],
    ) -> Result<(), PipelineError> {
        self.correlations
            .borrow_mut()
            .insert(timeframe.to_string(), records.to_vec());
        Ok(())
    }

    fn write_correlation_summary(
        &self,
        records: &[CorrelationRecord],
    ) -> Result<(), PipelineError> {
        *self.correlation_summary.borrow_mut() = Some(records.to_vec());
        Ok(())
    }

    fn write_classifications(&self, signals: &[ClassifiedSignal]) -> Result<(), PipelineError> {
        *self.classifications.borrow_mut() = Some(signals.to_vec());
        Ok(())
    }

    fn write_backtest(
        &self,
        trades: &[TradeResult],
        summary: &BacktestSummary,
    ) -> Result<(), PipelineError> {
        *self.backtest.borrow_mut() = Some((trades.to_vec(), summary.clone()));
        Ok(())
    }
}

/// Market-data port with canned responses; `failing()` errors on every call.
pub struct MockMarketDataPort {
    pub dominance: Result<f64, String>,
    pub coins: Result<Vec<CoinMarket>, String>,
    pub charts: HashMap<String, MarketChart>,
    pub fail_charts: bool,
}

impl MockMarketDataPort {
    pub fn new() -> Self {
        Self {
            dominance: Ok(0.0),
            coins: Ok(Vec::new()),
            charts: HashMap::new(),
            fail_charts: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            dominance: Err("connection refused".into()),
            coins: Err("connection refused".into()),
            charts: HashMap::new(),
            fail_charts: true,
        }
    }

    pub fn with_dominance(mut self, pct: f64) -> Self {
        self.dominance = Ok(pct);
        self
    }

    pub fn with_coins(mut self, coins: Vec<CoinMarket>) -> Self {
        self.coins = Ok(coins);
        self
    }

    /// Keyed by `{coin_id}:{days}` so intraday and daily charts can differ.
    pub fn with_chart(mut self, coin_id: &str, days: u32, chart: MarketChart) -> Self {
        self.charts.insert(format!("{coin_id}:{days}"), chart);
        self
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn global_dominance(&self, _symbol: &str) -> Result<f64, PipelineError> {
        self.dominance
            .clone()
            .map_err(|reason| PipelineError::Http { reason })
    }

    fn top_coins(&self, limit: usize) -> Result<Vec<CoinMarket>, PipelineError> {
        let mut coins = self
            .coins
            .clone()
            .map_err(|reason| PipelineError::Http { reason })?;
        coins.truncate(limit);
        Ok(coins)
    }

    fn market_chart(
        &self,
        coin_id: &str,
        days: u32,
        _interval: Option<&str>,
    ) -> Result<MarketChart, PipelineError> {
        if self.fail_charts {
            return Err(PipelineError::Http {
                reason: "connection refused".into(),
            });
        }
        Ok(self
            .charts
            .get(&format!("{coin_id}:{days}"))
            .cloned()
            .unwrap_or_default())
    }
}

pub fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn make_bar(symbol: &str, timeframe: &str, day: u32, open: f64, close: f64) -> PriceBar {
    PriceBar {
        symbol: symbol.to_string(),
        timeframe: timeframe.to_string(),
        datetime: ts(2024, 1, day),
        open,
        high: open.max(close) + 1.0,
        low: open.min(close) - 1.0,
        close,
        volume: 1000.0,
    }
}

/// Daily bars whose closes follow `closes`, with open = previous close.
pub fn make_series(symbol: &str, timeframe: &str, closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            make_bar(symbol, timeframe, i as u32 + 1, open, close)
        })
        .collect()
}

pub fn make_coin(id: &str, change_24h: Option<f64>) -> CoinMarket {
    CoinMarket {
        id: id.to_string(),
        symbol: id.to_string(),
        name: id.to_string(),
        current_price: Some(100.0),
        market_cap: Some(1_000_000_000.0),
        price_change_percentage_24h: change_24h,
    }
}

pub fn chart(values: &[f64]) -> MarketChart {
    let points: Vec<(i64, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as i64 * 300_000, v))
        .collect();
    MarketChart {
        prices: points.clone(),
        market_caps: points,
    }
}
