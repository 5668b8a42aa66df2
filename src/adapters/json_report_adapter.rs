//! JSON report adapter.
//!
//! A single result is written as one pretty-printed object; `write_all`
//! writes an array so the output stays one valid JSON document.

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::QuantError;
use crate::ports::report_port::ReportPort;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

pub struct JsonReportAdapter {
    output: Option<PathBuf>,
}

impl JsonReportAdapter {
    /// Writes to `output`, or to stdout when `None`.
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }

    fn emit<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<(), QuantError> {
        match &self.output {
            Some(path) => {
                let mut w = BufWriter::new(File::create(path)?);
                serde_json::to_writer_pretty(&mut w, value)?;
                writeln!(w)?;
                w.flush()?;
            }
            None => {
                let stdout = io::stdout();
                let mut w = stdout.lock();
                serde_json::to_writer_pretty(&mut w, value)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, result: &AnalysisResult) -> Result<(), QuantError> {
        self.emit(result)
    }

    fn write_all(&self, results: &[AnalysisResult]) -> Result<(), QuantError> {
        match results {
            [single] => self.emit(single),
            many => self.emit(many),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn result(ticker: &str) -> AnalysisResult {
        let ts = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap();
        AnalysisResult::empty(ticker, ts)
    }

    #[test]
    fn writes_single_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        JsonReportAdapter::new(Some(path.clone()))
            .write(&result("AAPL"))
            .unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["ticker"], "AAPL");
        assert_eq!(parsed["analysis_timestamp"], "2026-10-19 16:00:00");
    }

    #[test]
    fn writes_array_for_many() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        JsonReportAdapter::new(Some(path.clone()))
            .write_all(&[result("AAPL"), result("MSFT")])
            .unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[1]["ticker"], "MSFT");
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let adapter = JsonReportAdapter::new(Some(PathBuf::from("/nonexistent/dir/out.json")));
        assert!(matches!(adapter.write(&result("AAPL")), Err(QuantError::Io(_))));
    }
}
