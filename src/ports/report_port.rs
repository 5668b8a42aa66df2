//! Report generation port trait.

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::QuantError;

/// Port for writing analysis results.
pub trait ReportPort {
    fn write(&self, result: &AnalysisResult) -> Result<(), QuantError>;

    /// Default implementation: writes each result in turn.
    fn write_all(&self, results: &[AnalysisResult]) -> Result<(), QuantError> {
        results.iter().try_for_each(|r| self.write(r))
    }
}
