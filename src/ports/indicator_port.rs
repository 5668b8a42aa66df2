//! Indicator math port.
//!
//! Every method reads the value at the most recent bar and returns `None`
//! when the window exceeds the available history or the result is not finite.

use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdReading {
    pub line: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerReading {
    pub lower: Option<f64>,
    pub middle: Option<f64>,
    pub upper: Option<f64>,
}

pub trait NumericIndicatorProvider: Send + Sync {
    fn sma(&self, bars: &[OhlcvBar], period: usize) -> Option<f64>;
    fn rsi(&self, bars: &[OhlcvBar], period: usize) -> Option<f64>;
    fn macd(&self, bars: &[OhlcvBar], fast: usize, slow: usize, signal: usize)
    -> Option<MacdReading>;
    fn bollinger(&self, bars: &[OhlcvBar], period: usize, stddev_mult: f64)
    -> Option<BollingerReading>;
    fn atr(&self, bars: &[OhlcvBar], period: usize) -> Option<f64>;
}
