//! Domain error types.

/// Top-level error type for quantlens.
///
/// Partial metric gaps are not errors; they travel as warnings inside
/// [`StageOutcome`](crate::domain::outcome::StageOutcome).
#[derive(Debug, thiserror::Error)]
pub enum QuantError {
    #[error("market data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("calculation failed ({calculation}): {reason}")]
    CalculationFailure { calculation: String, reason: String },

    #[error("analysis failed for {ticker}: {reason}")]
    AnalysisFailure { ticker: String, reason: String },

    #[error("data parse error in {source_name}: {reason}")]
    DataParse { source_name: String, reason: String },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl QuantError {
    pub fn data_unavailable(ticker: &str, reason: impl Into<String>) -> Self {
        QuantError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }

    pub fn calculation(calculation: &str, reason: impl Into<String>) -> Self {
        QuantError::CalculationFailure {
            calculation: calculation.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&QuantError> for std::process::ExitCode {
    fn from(err: &QuantError) -> Self {
        let code: u8 = match err {
            QuantError::Io(_) | QuantError::Json(_) => 1,
            QuantError::ConfigParse { .. }
            | QuantError::ConfigMissing { .. }
            | QuantError::ConfigInvalid { .. } => 2,
            QuantError::DataUnavailable { .. } | QuantError::DataParse { .. } => 3,
            QuantError::CalculationFailure { .. } => 4,
            QuantError::AnalysisFailure { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
