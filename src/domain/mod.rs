//! Core domain types and analysis logic.

pub mod analysis;
pub mod config_validation;
pub mod error;
pub mod fundamental;
pub mod greeks;
pub mod indicator;
pub mod ohlcv;
pub mod options_chain;
pub mod outcome;
pub mod period;
pub mod signal;
pub mod technical;
pub mod tickers;
