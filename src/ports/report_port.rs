//! Output artifact port trait.

use crate::domain::backtest::{BacktestSummary, TradeResult};
use crate::domain::classify::ClassifiedSignal;
use crate::domain::correlation::CorrelationRecord;
use crate::domain::error::PipelineError;

/// Port for persisting each stage's output records.
pub trait ReportPort {
    /// Write one timeframe's correlation records.
    fn write_correlations(
        &self,
        timeframe: &str,
        records: &[CorrelationRecord],
    ) -> Result<(), PipelineError>;

    /// Write the combined correlation summary across all timeframes.
    fn write_correlation_summary(
        &self,
        records: &[CorrelationRecord],
    ) -> Result<(), PipelineError>;

    fn write_classifications(&self, signals: &[ClassifiedSignal]) -> Result<(), PipelineError>;

    fn write_backtest(
        &self,
        trades: &[TradeResult],
        summary: &BacktestSummary,
    ) -> Result<(), PipelineError>;
}
