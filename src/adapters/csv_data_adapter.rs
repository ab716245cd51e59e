//! CSV data-directory adapter.
//!
//! One file per symbol+timeframe named `{symbol}_{tf}.csv`, the dominance
//! reference as `usdt_dominance_{tf}.csv`, and the stage summaries alongside
//! them. All files carry headers.

use crate::domain::bar::{parse_datetime, PriceBar};
use crate::domain::classify::ClassifiedSignal;
use crate::domain::correlation::CorrelationRecord;
use crate::domain::error::PipelineError;
use crate::domain::signal::Signal;
use crate::ports::data_port::DataPort;
use std::fs;
use std::path::{Path, PathBuf};

pub const DOMINANCE_PREFIX: &str = "usdt_dominance";
pub const CORRELATION_SUMMARY: &str = "signals_summary.csv";
pub const CLASSIFICATION_SUMMARY: &str = "classification_summary.csv";

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

fn data_err(reason: String) -> PipelineError {
    PipelineError::Data { reason }
}

fn get_field<'a>(
    record: &'a csv::StringRecord,
    idx: usize,
    name: &str,
) -> Result<&'a str, PipelineError> {
    record
        .get(idx)
        .ok_or_else(|| data_err(format!("missing {name} column")))
}

fn parse_f64(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, PipelineError> {
    get_field(record, idx, name)?
        .parse()
        .map_err(|e| data_err(format!("invalid {name} value: {e}")))
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn series_path(&self, symbol: &str, timeframe: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", symbol, timeframe))
    }

    fn read_bars(
        &self,
        path: &Path,
        symbol: &str,
        timeframe: &str,
    ) -> Result<Vec<PriceBar>, PipelineError> {
        let content = fs::read_to_string(path)
            .map_err(|e| data_err(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| data_err(format!("CSV parse error: {e}")))?;

            let dt_str = get_field(&record, 0, "datetime")?;
            let datetime = parse_datetime(dt_str)
                .ok_or_else(|| data_err(format!("invalid datetime: {dt_str}")))?;

            bars.push(PriceBar {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
                datetime,
                open: parse_f64(&record, 1, "open")?,
                high: parse_f64(&record, 2, "high")?,
                low: parse_f64(&record, 3, "low")?,
                close: parse_f64(&record, 4, "close")?,
                volume: parse_f64(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.datetime);
        Ok(bars)
    }
}

impl DataPort for CsvDataAdapter {
    fn load_series(&self, symbol: &str, timeframe: &str) -> Result<Vec<PriceBar>, PipelineError> {
        let path = self.series_path(symbol, timeframe);
        if !path.exists() {
            return Err(PipelineError::NoData {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            });
        }
        self.read_bars(&path, symbol, timeframe)
    }

    fn load_dominance(&self, timeframe: &str) -> Result<Vec<PriceBar>, PipelineError> {
        let path = self.series_path(DOMINANCE_PREFIX, timeframe);
        if !path.exists() {
            return Err(PipelineError::MissingDominance {
                timeframe: timeframe.to_string(),
            });
        }
        self.read_bars(&path, DOMINANCE_PREFIX, timeframe)
    }

    fn list_symbols(&self, timeframe: &str) -> Result<Vec<String>, PipelineError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            data_err(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let suffix = format!("_{}.csv", timeframe);
        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| data_err(format!("directory entry error: {e}")))?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if name_str.ends_with(&suffix) && !name_str.starts_with(DOMINANCE_PREFIX) {
                let symbol = &name_str[..name_str.len() - suffix.len()];
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn load_correlations(&self) -> Result<Option<Vec<CorrelationRecord>>, PipelineError> {
        let path = self.base_path.join(CORRELATION_SUMMARY);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| data_err(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut records = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| data_err(format!("CSV parse error: {e}")))?;
            let dt_str = get_field(&record, 2, "date")?;
            records.push(CorrelationRecord {
                timeframe: get_field(&record, 0, "timeframe")?.to_string(),
                symbol: get_field(&record, 1, "symbol")?.to_string(),
                date: parse_datetime(dt_str)
                    .ok_or_else(|| data_err(format!("invalid date: {dt_str}")))?,
                correlation: parse_f64(&record, 3, "correlation")?,
            });
        }

        Ok(Some(records))
    }

    fn load_classifications(&self) -> Result<Option<Vec<ClassifiedSignal>>, PipelineError> {
        let path = self.base_path.join(CLASSIFICATION_SUMMARY);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| data_err(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut signals = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| data_err(format!("CSV parse error: {e}")))?;
            let signal: Signal = get_field(&record, 2, "signal")?
                .parse()
                .map_err(|e: String| data_err(e))?;

            signals.push(ClassifiedSignal {
                timeframe: get_field(&record, 0, "timeframe")?.to_string(),
                symbol: get_field(&record, 1, "symbol")?.to_string(),
                signal,
                confidence: parse_f64(&record, 3, "confidence")?,
                entry: parse_f64(&record, 4, "entry")?,
                exit: parse_f64(&record, 5, "exit")?,
                take_profit: parse_f64(&record, 6, "tp")?,
                stop_loss: parse_f64(&record, 7, "sl")?,
            });
        }

        Ok(Some(signals))
    }
}
