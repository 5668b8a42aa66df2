//! Rule-based signal synthesis.
//!
//! Three additive sub-scores (technical, options, fundamental) are summed into
//! a confidence score and bucketed into a categorical [`Signal`]. Every rule
//! that fires appends one line to the reasoning trail, in evaluation order.

use crate::domain::error::QuantError;
use crate::domain::fundamental::FundamentalMetricSet;
use crate::domain::options_chain::OptionsMetricSet;
use crate::domain::technical::TechnicalIndicatorSet;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const STRONG_BUY_THRESHOLD: f64 = 4.0;
pub const BUY_THRESHOLD: f64 = 2.0;
pub const SELL_THRESHOLD: f64 = -2.0;
pub const STRONG_SELL_THRESHOLD: f64 = -4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::StrongBuy => "STRONG_BUY",
            Signal::Buy => "BUY",
            Signal::Neutral => "NEUTRAL",
            Signal::Sell => "SELL",
            Signal::StrongSell => "STRONG_SELL",
        };
        f.write_str(s)
    }
}

/// First matching bucket wins, so boundaries fall into the stricter bucket.
pub fn classify(total: f64) -> Signal {
    if total >= STRONG_BUY_THRESHOLD {
        Signal::StrongBuy
    } else if total >= BUY_THRESHOLD {
        Signal::Buy
    } else if total <= STRONG_SELL_THRESHOLD {
        Signal::StrongSell
    } else if total <= SELL_THRESHOLD {
        Signal::Sell
    } else {
        Signal::Neutral
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingSignal {
    pub signal: Signal,
    pub confidence_score: f64,
    pub reasoning: Vec<String>,
    pub technical_score: f64,
    pub options_score: f64,
    pub fundamental_score: f64,
}

impl TradingSignal {
    fn fallback(reason: impl fmt::Display) -> Self {
        Self {
            signal: Signal::Neutral,
            confidence_score: 0.0,
            reasoning: vec![format!("Error generating signal: {reason}")],
            technical_score: 0.0,
            options_score: 0.0,
            fundamental_score: 0.0,
        }
    }
}

/// Everything the synthesizer reads. Missing stages are `None`.
#[derive(Debug, Clone, Copy)]
pub struct SignalInputs<'a> {
    pub current_price: f64,
    pub technical: Option<&'a TechnicalIndicatorSet>,
    pub fundamental: Option<&'a FundamentalMetricSet>,
    pub options: Option<&'a OptionsMetricSet>,
}

#[derive(Default)]
struct Scorecard {
    technical: f64,
    options: f64,
    fundamental: f64,
    reasoning: Vec<String>,
}

impl Scorecard {
    fn note(&mut self, line: impl Into<String>) {
        self.reasoning.push(line.into());
    }

    fn score_technical(&mut self, price: f64, set: &TechnicalIndicatorSet) {
        if let (Some(sma_50), Some(sma_200)) = (set.sma_50, set.sma_200) {
            if price > sma_200 {
                self.technical += 1.0;
                self.note("Bullish trend: Price above 200-day SMA");
            } else if price < sma_200 {
                self.technical -= 1.0;
                self.note("Bearish trend: Price below 200-day SMA");
            }

            if sma_50 > sma_200 {
                self.technical += 0.5;
                self.note("Bullish momentum: 50-day SMA above 200-day SMA");
            } else {
                self.technical -= 0.5;
                self.note("Bearish momentum: 50-day SMA below 200-day SMA");
            }
        }

        if let Some(rsi) = set.rsi_14 {
            if rsi < 30.0 {
                self.technical += 1.0;
                self.note(format!("Oversold conditions: RSI at {rsi:.1}"));
            } else if rsi > 70.0 {
                self.technical -= 1.0;
                self.note(format!("Overbought conditions: RSI at {rsi:.1}"));
            } else if (40.0..=60.0).contains(&rsi) {
                self.note(format!("Neutral RSI: {rsi:.1}"));
            }
        }

        if let Some(hist) = set.macd_histogram {
            if hist > 0.0 {
                self.technical += 0.5;
                self.note("Positive MACD momentum");
            } else {
                self.technical -= 0.5;
                self.note("Negative MACD momentum");
            }
        }
    }

    fn score_options(&mut self, set: &OptionsMetricSet) {
        if !set.options_data_available {
            return;
        }
        let Some(detail) = set.detail() else {
            return;
        };

        let ratio = detail.put_call_volume_ratio;
        if ratio > 1.2 {
            self.options += 1.0;
            self.note(format!("Contrarian sentiment: High put-call ratio ({ratio:.2})"));
        } else if ratio < 0.8 {
            self.options -= 1.0;
            self.note(format!("Contrarian sentiment: Low put-call ratio ({ratio:.2})"));
        }

        // zero counts as unreported
        match detail.call_iv.filter(|iv| *iv != 0.0) {
            Some(iv) if iv > 0.30 => {
                self.options += 0.5;
                self.note("Elevated implied volatility (fear)");
            }
            Some(iv) if iv < 0.15 => {
                self.options -= 0.5;
                self.note("Low implied volatility (complacency)");
            }
            _ => {}
        }
    }

    fn score_fundamental(&mut self, set: &FundamentalMetricSet) {
        if let Some(pe) = set.forward_pe {
            if (5.0..=30.0).contains(&pe) {
                self.fundamental += 0.5;
                self.note(format!("Reasonable P/E ratio: {pe:.1}"));
            } else if pe > 30.0 {
                self.fundamental -= 0.5;
                self.note(format!("High P/E ratio: {pe:.1}"));
            }
        }

        if let Some(pb) = set.price_to_book.filter(|pb| *pb < 3.0) {
            self.fundamental += 0.5;
            self.note(format!("Reasonable P/B ratio: {pb:.1}"));
        }

        if let Some(dy) = set.dividend_yield.filter(|dy| *dy > 0.02) {
            self.fundamental += 0.5;
            self.note(format!("Attractive dividend yield: {:.1}%", dy * 100.0));
        }
    }
}

fn ensure_finite(label: &str, value: Option<f64>) -> Result<(), QuantError> {
    match value {
        Some(v) if !v.is_finite() => Err(QuantError::calculation(
            "signal",
            format!("{label} is not finite ({v})"),
        )),
        _ => Ok(()),
    }
}

fn check_inputs(inputs: &SignalInputs<'_>) -> Result<(), QuantError> {
    ensure_finite("current price", Some(inputs.current_price))?;
    if let Some(t) = inputs.technical {
        ensure_finite("sma_50", t.sma_50)?;
        ensure_finite("sma_200", t.sma_200)?;
        ensure_finite("rsi_14", t.rsi_14)?;
        ensure_finite("macd_histogram", t.macd_histogram)?;
    }
    if let Some(f) = inputs.fundamental {
        ensure_finite("forward_pe", f.forward_pe)?;
        ensure_finite("price_to_book", f.price_to_book)?;
        ensure_finite("dividend_yield", f.dividend_yield)?;
    }
    if let Some(detail) = inputs.options.and_then(OptionsMetricSet::detail) {
        ensure_finite("put_call_volume_ratio", Some(detail.put_call_volume_ratio))?;
        ensure_finite("call_iv", detail.call_iv)?;
    }
    Ok(())
}

pub fn try_synthesize(inputs: &SignalInputs<'_>) -> Result<TradingSignal, QuantError> {
    check_inputs(inputs)?;

    let mut card = Scorecard::default();
    if let Some(t) = inputs.technical {
        card.score_technical(inputs.current_price, t);
    }
    if let Some(o) = inputs.options {
        card.score_options(o);
    }
    if let Some(f) = inputs.fundamental {
        card.score_fundamental(f);
    }

    let total = card.technical + card.options + card.fundamental;
    if !total.is_finite() {
        return Err(QuantError::calculation("signal", "total score is not finite"));
    }

    Ok(TradingSignal {
        signal: classify(total),
        confidence_score: total,
        reasoning: card.reasoning,
        technical_score: card.technical,
        options_score: card.options,
        fundamental_score: card.fundamental,
    })
}

/// Never fails: an internal error degrades to a NEUTRAL signal with zero
/// sub-scores and the error as its only reasoning line.
pub fn synthesize(inputs: &SignalInputs<'_>) -> TradingSignal {
    try_synthesize(inputs).unwrap_or_else(TradingSignal::fallback)
}
