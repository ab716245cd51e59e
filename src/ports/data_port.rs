//! Data access port trait.
//!
//! Covers both the raw input series and the intermediate artifacts that
//! couple the pipeline stages, so `classify` and `backtest` can each run on
//! the previous stage's persisted output.

use crate::domain::bar::PriceBar;
use crate::domain::classify::ClassifiedSignal;
use crate::domain::correlation::CorrelationRecord;
use crate::domain::error::PipelineError;

pub trait DataPort {
    /// Load the price series for one symbol+timeframe, time-ordered.
    fn load_series(&self, symbol: &str, timeframe: &str) -> Result<Vec<PriceBar>, PipelineError>;

    /// Load the dominance reference series for one timeframe.
    /// `MissingDominance` when the series does not exist.
    fn load_dominance(&self, timeframe: &str) -> Result<Vec<PriceBar>, PipelineError>;

    /// Symbols with a stored series on the given timeframe, sorted,
    /// excluding the dominance series itself.
    fn list_symbols(&self, timeframe: &str) -> Result<Vec<String>, PipelineError>;

    /// Read back the combined correlation summary written by the signals
    /// stage. `Ok(None)` when the summary has not been produced yet;
    /// malformed rows are a hard error.
    fn load_correlations(&self) -> Result<Option<Vec<CorrelationRecord>>, PipelineError>;

    /// Read back the classification summary written by the classify stage.
    /// Same absence/malformed contract as [`Self::load_correlations`].
    fn load_classifications(&self) -> Result<Option<Vec<ClassifiedSignal>>, PipelineError>;
}
