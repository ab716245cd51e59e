//! CSV output adapter for stage summaries.
//!
//! Writes into the same data directory the input series live in, mirroring
//! file names the rest of the toolchain expects. Output is fully determined
//! by the input records, so re-running a stage rewrites identical bytes.

use crate::domain::backtest::{BacktestSummary, TradeResult};
use crate::domain::bar::format_datetime;
use crate::domain::classify::ClassifiedSignal;
use crate::domain::correlation::CorrelationRecord;
use crate::domain::error::PipelineError;
use crate::ports::report_port::ReportPort;
use std::path::PathBuf;

pub const BACKTEST_RESULTS: &str = "backtest_results.csv";
pub const BACKTEST_SUMMARY: &str = "backtest_summary.csv";

pub struct CsvReportAdapter {
    base_path: PathBuf,
}

impl CsvReportAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn writer(&self, file_name: &str) -> Result<csv::Writer<std::fs::File>, PipelineError> {
        let path = self.base_path.join(file_name);
        csv::Writer::from_path(&path).map_err(|e| PipelineError::Data {
            reason: format!("failed to open {} for writing: {}", path.display(), e),
        })
    }

    fn write_correlation_rows(
        &self,
        file_name: &str,
        records: &[CorrelationRecord],
    ) -> Result<(), PipelineError> {
        let mut wtr = self.writer(file_name)?;
        write_rows(&mut wtr, ["timeframe", "symbol", "date", "correlation"], records, |r| {
            vec![
                r.timeframe.clone(),
                r.symbol.clone(),
                format_datetime(&r.date),
                r.correlation.to_string(),
            ]
        })
    }

    fn classification_row(signal: &ClassifiedSignal) -> Vec<String> {
        vec![
            signal.timeframe.clone(),
            signal.symbol.clone(),
            signal.signal.to_string(),
            signal.confidence.to_string(),
            signal.entry.to_string(),
            signal.exit.to_string(),
            signal.take_profit.to_string(),
            signal.stop_loss.to_string(),
        ]
    }
}

fn write_rows<T, F: Fn(&T) -> Vec<String>, const N: usize>(
    wtr: &mut csv::Writer<std::fs::File>,
    header: [&str; N],
    rows: &[T],
    to_row: F,
) -> Result<(), PipelineError> {
    let io_err = |e: csv::Error| PipelineError::Data {
        reason: format!("CSV write error: {e}"),
    };
    wtr.write_record(header).map_err(io_err)?;
    for row in rows {
        wtr.write_record(to_row(row)).map_err(io_err)?;
    }
    wtr.flush().map_err(|e| PipelineError::Data {
        reason: format!("CSV flush error: {e}"),
    })
}

impl ReportPort for CsvReportAdapter {
    fn write_correlations(
        &self,
        timeframe: &str,
        records: &[CorrelationRecord],
    ) -> Result<(), PipelineError> {
        self.write_correlation_rows(&format!("signals_summary_{timeframe}.csv"), records)
    }

    fn write_correlation_summary(
        &self,
        records: &[CorrelationRecord],
    ) -> Result<(), PipelineError> {
        self.write_correlation_rows(super::csv_data_adapter::CORRELATION_SUMMARY, records)
    }

    fn write_classifications(&self, signals: &[ClassifiedSignal]) -> Result<(), PipelineError> {
        let mut wtr = self.writer(super::csv_data_adapter::CLASSIFICATION_SUMMARY)?;
        write_rows(
            &mut wtr,
            ["timeframe", "symbol", "signal", "confidence", "entry", "exit", "tp", "sl"],
            signals,
            Self::classification_row,
        )
    }

    fn write_backtest(
        &self,
        trades: &[TradeResult],
        summary: &BacktestSummary,
    ) -> Result<(), PipelineError> {
        let mut wtr = self.writer(BACKTEST_RESULTS)?;
        write_rows(
            &mut wtr,
            ["timeframe", "symbol", "signal", "confidence", "entry", "exit", "tp", "sl", "return"],
            trades,
            |t| {
                let mut row = Self::classification_row(&t.signal);
                row.push(t.realized_return.to_string());
                row
            },
        )?;

        let rows: Vec<(String, f64)> = summary
            .iter()
            .map(|(tf, ret)| (tf.clone(), *ret))
            .collect();
        let mut wtr = self.writer(BACKTEST_SUMMARY)?;
        write_rows(&mut wtr, ["timeframe", "return"], &rows, |(tf, ret)| {
            vec![tf.clone(), ret.to_string()]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::csv_data_adapter::CsvDataAdapter;
    use crate::domain::backtest::run_backtest;
    use crate::domain::signal::Signal;
    use crate::ports::data_port::DataPort;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn sample_record() -> CorrelationRecord {
        CorrelationRecord {
            timeframe: "1d".into(),
            symbol: "BTCUSDT".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 17)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            correlation: -0.5,
        }
    }

    fn sample_signal() -> ClassifiedSignal {
        ClassifiedSignal {
            timeframe: "1d".into(),
            symbol: "BTCUSDT".into(),
            signal: Signal::Long,
            confidence: 0.5,
            entry: 100.0,
            exit: 110.0,
            take_profit: 102.0,
            stop_loss: 99.0,
        }
    }

    #[test]
    fn correlation_files_round_trip_through_data_adapter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        let report = CsvReportAdapter::new(path.clone());

        let records = vec![sample_record()];
        report.write_correlations("1d", &records).unwrap();
        report.write_correlation_summary(&records).unwrap();

        assert!(path.join("signals_summary_1d.csv").exists());

        let data = CsvDataAdapter::new(path);
        assert_eq!(data.load_correlations().unwrap(), Some(records));
    }

    #[test]
    fn classification_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        CsvReportAdapter::new(path.clone())
            .write_classifications(&[sample_signal()])
            .unwrap();

        let data = CsvDataAdapter::new(path);
        assert_eq!(
            data.load_classifications().unwrap(),
            Some(vec![sample_signal()])
        );
    }

    #[test]
    fn backtest_files_carry_return_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let trades = run_backtest(&[sample_signal()]);
        let mut summary: BacktestSummary = BTreeMap::new();
        summary.insert("1d".into(), 0.1);

        CsvReportAdapter::new(path.clone())
            .write_backtest(&trades, &summary)
            .unwrap();

        let results = fs::read_to_string(path.join(BACKTEST_RESULTS)).unwrap();
        assert!(results.starts_with("timeframe,symbol,signal,confidence,entry,exit,tp,sl,return\n"));
        assert!(results.contains("1d,BTCUSDT,long,0.5,100,110,102,99,0.1"));

        let summary_csv = fs::read_to_string(path.join(BACKTEST_SUMMARY)).unwrap();
        assert_eq!(summary_csv, "timeframe,return\n1d,0.1\n");
    }

    #[test]
    fn rewriting_identical_records_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        let report = CsvReportAdapter::new(path.clone());

        let records = vec![sample_record()];
        report.write_correlation_summary(&records).unwrap();
        let first = fs::read(path.join("signals_summary.csv")).unwrap();
        report.write_correlation_summary(&records).unwrap();
        let second = fs::read(path.join("signals_summary.csv")).unwrap();
        assert_eq!(first, second);
    }
}
