//! Domain error types.

/// Top-level error type for domsig.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("http request failed: {reason}")]
    Http { reason: String },

    #[error("unexpected API response: {reason}")]
    Api { reason: String },

    #[error("no dominance series for timeframe {timeframe}")]
    MissingDominance { timeframe: String },

    #[error("no data for {symbol} on timeframe {timeframe}")]
    NoData { symbol: String, timeframe: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PipelineError> for std::process::ExitCode {
    fn from(err: &PipelineError) -> Self {
        let code: u8 = match err {
            PipelineError::Io(_) => 1,
            PipelineError::ConfigParse { .. }
            | PipelineError::ConfigMissing { .. }
            | PipelineError::ConfigInvalid { .. } => 2,
            PipelineError::Data { .. } => 3,
            PipelineError::Http { .. } | PipelineError::Api { .. } => 4,
            PipelineError::MissingDominance { .. } | PipelineError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
