//! Port traits: the seams between the analysis domain and the outside world.

pub mod clock_port;
pub mod config_port;
pub mod data_port;
pub mod diagnostic_port;
pub mod indicator_port;
pub mod pricing_port;
pub mod report_port;
