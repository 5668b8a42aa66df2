//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters
//! - `IndicatorSeries`: A time series of indicator values
//!
//! [`SeriesIndicatorProvider`] adapts the series calculators to the
//! [`NumericIndicatorProvider`] port by reading the most recent valid point.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

use crate::domain::ohlcv::OhlcvBar;
use crate::ports::indicator_port::{BollingerReading, MacdReading, NumericIndicatorProvider};
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
    Atr(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// The final point, if it exists and is past warmup.
    pub fn latest(&self) -> Option<&IndicatorValue> {
        self.values.last().filter(|p| p.valid).map(|p| &p.value)
    }

    /// Final simple value, rejecting warmup and non-finite results.
    pub fn latest_simple(&self) -> Option<f64> {
        match self.latest() {
            Some(IndicatorValue::Simple(v)) if v.is_finite() => Some(*v),
            _ => None,
        }
    }
}

/// Default [`NumericIndicatorProvider`] backed by the series calculators in
/// this module.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesIndicatorProvider;

impl NumericIndicatorProvider for SeriesIndicatorProvider {
    fn sma(&self, bars: &[OhlcvBar], period: usize) -> Option<f64> {
        sma::calculate_sma(bars, period).latest_simple()
    }

    fn rsi(&self, bars: &[OhlcvBar], period: usize) -> Option<f64> {
        rsi::calculate_rsi(bars, period).latest_simple()
    }

    fn macd(
        &self,
        bars: &[OhlcvBar],
        fast: usize,
        slow: usize,
        signal: usize,
    ) -> Option<MacdReading> {
        match macd::calculate_macd(bars, fast, slow, signal).latest() {
            Some(IndicatorValue::Macd {
                line,
                signal,
                histogram,
            }) => Some(MacdReading {
                line: Some(*line).filter(|v| v.is_finite()),
                signal: Some(*signal).filter(|v| v.is_finite()),
                histogram: Some(*histogram).filter(|v| v.is_finite()),
            }),
            _ => None,
        }
    }

    fn bollinger(
        &self,
        bars: &[OhlcvBar],
        period: usize,
        stddev_mult: f64,
    ) -> Option<BollingerReading> {
        let mult_x100 = (stddev_mult * 100.0).round() as u32;
        match bollinger::calculate_bollinger(bars, period, mult_x100).latest() {
            Some(IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            }) => Some(BollingerReading {
                lower: Some(*lower).filter(|v| v.is_finite()),
                middle: Some(*middle).filter(|v| v.is_finite()),
                upper: Some(*upper).filter(|v| v.is_finite()),
            }),
            _ => None,
        }
    }

    fn atr(&self, bars: &[OhlcvBar], period: usize) -> Option<f64> {
        atr::calculate_atr(bars, period).latest_simple()
    }
}
