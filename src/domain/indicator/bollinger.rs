//! Bollinger Bands.
//!
//! Middle = SMA(n) of close; Upper/Lower = Middle ± mult × population StdDev
//! (divides by N). Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULT_X100: u32 = 200;

fn band(window: &[OhlcvBar], mult: f64) -> IndicatorValue {
    let n = window.len() as f64;
    let middle = window.iter().map(|b| b.close).sum::<f64>() / n;
    let variance = window
        .iter()
        .map(|b| (b.close - middle).powi(2))
        .sum::<f64>()
        / n;
    let width = mult * variance.sqrt();

    IndicatorValue::Bollinger {
        upper: middle + width,
        middle,
        lower: middle - width,
    }
}

pub fn calculate_bollinger(
    bars: &[OhlcvBar],
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Bollinger {
        period,
        stddev_mult_x100,
    };
    if period == 0 {
        return IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        };
    }

    let mult = stddev_mult_x100 as f64 / 100.0;
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i + 1 >= period {
                IndicatorPoint {
                    date: bar.date,
                    valid: true,
                    value: band(&bars[i + 1 - period..=i], mult),
                }
            } else {
                IndicatorPoint {
                    date: bar.date,
                    valid: false,
                    value: IndicatorValue::Bollinger {
                        upper: 0.0,
                        middle: 0.0,
                        lower: 0.0,
                    },
                }
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
