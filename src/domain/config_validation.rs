//! Configuration validation.
//!
//! Checks every analysis setting before any ticker is analysed and turns the
//! validated values into an [`AnalyzerConfig`].

use crate::domain::analysis::{AnalyzerConfig, DEFAULT_RISK_FREE_RATE};
use crate::domain::error::QuantError;
use crate::domain::period::{HistoricalPeriod, UnknownPeriod};
use crate::domain::tickers::parse_tickers;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<AnalyzerConfig, QuantError> {
    let risk_free_rate = validate_risk_free_rate(config)?;
    let historical_period = validate_historical_period(config)?;
    validate_as_of(config)?;
    validate_tickers(config)?;
    Ok(AnalyzerConfig {
        risk_free_rate,
        historical_period,
    })
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> QuantError {
    QuantError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<f64, QuantError> {
    let value = config.get_double("analysis", "risk_free_rate", DEFAULT_RISK_FREE_RATE);
    if !value.is_finite() || !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "analysis",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(value)
}

fn validate_historical_period(config: &dyn ConfigPort) -> Result<HistoricalPeriod, QuantError> {
    match config.get_string("analysis", "historical_period") {
        None => Ok(HistoricalPeriod::default()),
        Some(code) => code
            .parse()
            .map_err(|e: UnknownPeriod| {
                invalid("analysis", "historical_period", e.to_string())
            }),
    }
}

fn validate_as_of(config: &dyn ConfigPort) -> Result<Option<NaiveDate>, QuantError> {
    match config.get_string("data", "as_of") {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid("data", "as_of", "invalid as_of format, expected YYYY-MM-DD")),
    }
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), QuantError> {
    if let Some(list) = config.get_string("analysis", "tickers") {
        parse_tickers(&list).map_err(|e| invalid("analysis", "tickers", e.to_string()))?;
    }
    Ok(())
}
