//! Diagnostic sink port.
//!
//! Warnings raised while analysing are recorded here instead of through a
//! process-wide logger, so callers decide where they go.

pub trait DiagnosticSink: Send + Sync {
    fn record(&self, ticker: &str, message: &str);
}
