//! Technical indicator engine.
//!
//! Reads trend, momentum and volatility indicators at the most recent bar of a
//! daily series. Individual indicators that cannot be computed are omitted;
//! the set as a whole is "not computable" below [`MIN_BARS`] or when nothing
//! could be computed.

use crate::domain::indicator::bollinger::{DEFAULT_MULT_X100, DEFAULT_PERIOD};
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::outcome::StageOutcome;
use crate::ports::indicator_port::NumericIndicatorProvider;
use serde::{Deserialize, Serialize};

pub const MIN_BARS: usize = 50;
pub const SMA_SHORT: usize = 50;
pub const SMA_LONG: usize = 200;
pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicatorSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma_50: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma_200: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi_14: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_histogram: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_lower: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_middle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_upper: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atr_14: Option<f64>,
}

impl TechnicalIndicatorSet {
    pub fn is_empty(&self) -> bool {
        [
            self.sma_50,
            self.sma_200,
            self.rsi_14,
            self.macd,
            self.macd_signal,
            self.macd_histogram,
            self.bb_lower,
            self.bb_middle,
            self.bb_upper,
            self.atr_14,
        ]
        .iter()
        .all(Option::is_none)
    }
}

/// `None` in the outcome means "not computable".
pub fn compute_technical_indicators(
    provider: &dyn NumericIndicatorProvider,
    bars: &[OhlcvBar],
) -> StageOutcome<Option<TechnicalIndicatorSet>> {
    if bars.len() < MIN_BARS {
        return StageOutcome::with_warning(
            None,
            format!(
                "Insufficient data for technical indicators: have {} bars, need {}",
                bars.len(),
                MIN_BARS
            ),
        );
    }

    let macd = provider.macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL);
    let bands = provider.bollinger(bars, DEFAULT_PERIOD, DEFAULT_MULT_X100 as f64 / 100.0);

    let set = TechnicalIndicatorSet {
        sma_50: provider.sma(bars, SMA_SHORT),
        sma_200: provider.sma(bars, SMA_LONG),
        rsi_14: provider.rsi(bars, RSI_PERIOD),
        macd: macd.and_then(|m| m.line),
        macd_signal: macd.and_then(|m| m.signal),
        macd_histogram: macd.and_then(|m| m.histogram),
        bb_lower: bands.and_then(|b| b.lower),
        bb_middle: bands.and_then(|b| b.middle),
        bb_upper: bands.and_then(|b| b.upper),
        atr_14: provider.atr(bars, ATR_PERIOD),
    };

    if set.is_empty() {
        StageOutcome::with_warning(None, "No technical indicator could be computed")
    } else {
        StageOutcome::clean(Some(set))
    }
}
