//! Config validation for the pipeline and analyzer sections.
//!
//! Values are validated before any stage touches data, so a bad config fails
//! fast with exit code 2 instead of surfacing mid-run.

use crate::domain::error::PipelineError;
use crate::ports::config_port::ConfigPort;

fn invalid(section: &str, key: &str, reason: &str) -> PipelineError {
    PipelineError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: reason.into(),
    }
}

fn check_threshold(config: &dyn ConfigPort, section: &str, default: f64) -> Result<(), PipelineError> {
    let threshold = config.get_double(section, "threshold", default);
    if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
        return Err(invalid(section, "threshold", "must be in (0, 1]"));
    }
    Ok(())
}

/// Validate the `[data]`, `[signals]` and `[classify]` sections.
pub fn validate_pipeline_config(config: &dyn ConfigPort) -> Result<(), PipelineError> {
    if let Some(dir) = config.get_string("data", "dir") {
        if dir.trim().is_empty() {
            return Err(invalid("data", "dir", "must not be empty"));
        }
    }

    check_threshold(config, "signals", crate::domain::signal::DEFAULT_THRESHOLD)?;

    let min_samples = config.get_int(
        "signals",
        "min_samples",
        crate::domain::correlation::DEFAULT_MIN_SAMPLES as i64,
    );
    if min_samples < 2 {
        return Err(invalid("signals", "min_samples", "must be at least 2"));
    }

    if let Some(timeframes) = config.get_string("signals", "timeframes") {
        if timeframes.split(',').all(|tf| tf.trim().is_empty()) {
            return Err(invalid("signals", "timeframes", "must list at least one timeframe"));
        }
    }

    let tp_pct = config.get_double("classify", "tp_pct", crate::domain::classify::DEFAULT_TP_PCT);
    if !tp_pct.is_finite() || tp_pct <= 0.0 {
        return Err(invalid("classify", "tp_pct", "must be positive"));
    }
    let sl_pct = config.get_double("classify", "sl_pct", crate::domain::classify::DEFAULT_SL_PCT);
    if !sl_pct.is_finite() || sl_pct <= 0.0 || sl_pct >= 1.0 {
        return Err(invalid("classify", "sl_pct", "must be in (0, 1)"));
    }

    Ok(())
}

/// Validate the `[analyze]` section.
pub fn validate_analyzer_config(config: &dyn ConfigPort) -> Result<(), PipelineError> {
    check_threshold(config, "analyze", crate::domain::analyzer::DEFAULT_THRESHOLD)?;

    let top_limit = config.get_int("analyze", "top_limit", 100);
    if top_limit < 1 {
        return Err(invalid("analyze", "top_limit", "must be at least 1"));
    }

    if let Some(base) = config.get_string("analyze", "api_base") {
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(invalid("analyze", "api_base", "must be an http(s) URL"));
        }
    }

    Ok(())
}
