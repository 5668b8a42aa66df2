//! quantlens: per-ticker quantitative analysis engine.
//!
//! Combines technical indicators, validated fundamental ratios and options
//! chain sentiment into a scored trading signal. Hexagonal architecture:
//! domain logic in [`domain`], port traits in [`ports`], concrete
//! implementations in [`adapters`], command-line entry in [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
