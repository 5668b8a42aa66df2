//! Result-or-warning carrier for analysis stages.

/// A stage's output together with the warnings produced while computing it.
///
/// Stages never fail for expected data gaps; they report `value` (possibly
/// empty) and push human-readable warnings that the orchestrator folds into
/// `data_quality`.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

impl<T> StageOutcome<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(value: T, warning: impl Into<String>) -> Self {
        Self {
            value,
            warnings: vec![warning.into()],
        }
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}
