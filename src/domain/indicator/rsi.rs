//! RSI (Relative Strength Index) with Wilder smoothing.
//!
//! - First average: simple mean of the first n gains/losses
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss); RSI = 100 when avg_loss == 0.
//! Warmup: first n bars are invalid (n price changes are needed).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

fn rsi_from(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut values: Vec<IndicatorPoint> = bars
        .iter()
        .map(|b| IndicatorPoint {
            date: b.date,
            valid: false,
            value: IndicatorValue::Simple(0.0),
        })
        .collect();

    if period == 0 || bars.len() <= period {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values,
        };
    }

    let changes: Vec<(f64, f64)> = bars
        .windows(2)
        .map(|w| {
            let change = w[1].close - w[0].close;
            (change.max(0.0), (-change).max(0.0))
        })
        .collect();

    let n = period as f64;
    let mut avg_gain = changes[..period].iter().map(|c| c.0).sum::<f64>() / n;
    let mut avg_loss = changes[..period].iter().map(|c| c.1).sum::<f64>() / n;
    values[period].valid = true;
    values[period].value = IndicatorValue::Simple(rsi_from(avg_gain, avg_loss));

    for (idx, &(gain, loss)) in changes.iter().enumerate().skip(period) {
        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
        // change idx sits between bars idx and idx + 1
        let point = &mut values[idx + 1];
        point.valid = true;
        point.value = IndicatorValue::Simple(rsi_from(avg_gain, avg_loss));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);

        assert_eq!(series.values.len(), 15);
        assert!(series.values[..14].iter().all(|p| !p.valid));
        assert!(series.values[14].valid);
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);
        assert_eq!(series.latest_simple(), Some(100.0));
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);
        assert!(series.latest_simple().unwrap().abs() < 1e-12);
    }

    #[test]
    fn rsi_wilder_step() {
        // period 2: changes +2, -1, +1
        let series = calculate_rsi(&make_bars(&[10.0, 12.0, 11.0, 12.0]), 2);
        // seed: gain 1.0, loss 0.5 → RSI = 100 - 100/3
        if let IndicatorValue::Simple(v) = series.values[2].value {
            assert!((v - (100.0 - 100.0 / 3.0)).abs() < 1e-9);
        }
        // next: gain (1.0 + 1.0)/2 = 1.0, loss (0.5 + 0)/2 = 0.25 → rs 4 → 80
        assert!((series.latest_simple().unwrap() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn rsi_insufficient_or_zero_period() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        assert!(calculate_rsi(&bars, 14).latest().is_none());
        assert!(calculate_rsi(&bars, 0).values.iter().all(|p| !p.valid));
        assert!(calculate_rsi(&[], 14).values.is_empty());
    }

    #[test]
    fn rsi_stays_in_range() {
        let prices: Vec<f64> = (1..=40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let series = calculate_rsi(&make_bars(&prices), 14);
        for point in series.values.iter().filter(|p| p.valid) {
            if let IndicatorValue::Simple(rsi) = point.value {
                assert!((0.0..=100.0).contains(&rsi), "RSI {rsi} out of range");
            }
        }
    }
}
