//! Concrete adapter implementations for ports.

pub mod clock;
pub mod diagnostics;
pub mod file_config_adapter;
pub mod json_report_adapter;
pub mod snapshot_dir_adapter;
