//! Diagnostic sink adapters.

use crate::ports::diagnostic_port::DiagnosticSink;
use std::sync::Mutex;

/// Forwards every warning to `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, ticker: &str, message: &str) {
        tracing::warn!(ticker, "{message}");
    }
}

/// Keeps warnings in memory, in recording order.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn messages_for(&self, ticker: &str) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(t, _)| t == ticker)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, ticker: &str, message: &str) {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push((ticker.to_string(), message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_groups_by_ticker() {
        let sink = MemorySink::default();
        sink.record("AAPL", "Missing dividend yield");
        sink.record("MSFT", "Failed to fetch market data");
        sink.record("AAPL", "Invalid forward P/E ratio: 1500");

        assert_eq!(
            sink.messages_for("AAPL"),
            vec!["Missing dividend yield", "Invalid forward P/E ratio: 1500"]
        );
        assert_eq!(sink.entries().len(), 3);
        assert!(!sink.is_empty());
    }

    #[test]
    fn tracing_sink_accepts_without_subscriber() {
        TracingSink.record("AAPL", "no subscriber installed");
    }
}
