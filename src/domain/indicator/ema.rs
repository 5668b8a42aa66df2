//! Exponential Moving Average, the building block of MACD.
//!
//! k = 2/(n+1), seeded with the SMA of the first n values, then
//! EMA[i] = X[i]*k + EMA[i-1]*(1-k). Warmup: first (n-1) values are `None`.

/// EMA over an arbitrary sequence; `None` during warmup.
///
/// Returns an empty vector when `period` is zero.
pub fn ema_of(input: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(input.len());
    let mut seed_sum = 0.0;
    let mut ema: Option<f64> = None;

    for (i, &x) in input.iter().enumerate() {
        ema = match ema {
            Some(prev) => Some(x * k + prev * (1.0 - k)),
            None => {
                seed_sum += x;
                (i + 1 == period).then(|| seed_sum / period as f64)
            }
        };
        out.push(ema);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_seed_is_sma_then_recursive() {
        let out = ema_of(&[10.0, 20.0, 30.0, 40.0], 3);

        assert_eq!(out[0], None);
        assert_eq!(out[1], None);

        let seed = 20.0;
        let next = 40.0 * 0.5 + seed * 0.5;
        assert!((out[2].unwrap() - seed).abs() < 1e-12);
        assert!((out[3].unwrap() - next).abs() < 1e-12);
    }

    #[test]
    fn ema_of_period_one_tracks_input() {
        let out = ema_of(&[3.0, 5.0, 7.0], 1);
        assert_eq!(out, vec![Some(3.0), Some(5.0), Some(7.0)]);
    }

    #[test]
    fn ema_of_zero_period_is_empty() {
        assert!(ema_of(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn ema_constant_input_is_constant() {
        let out = ema_of(&[100.0; 6], 3);
        for v in out.into_iter().skip(2) {
            assert!((v.unwrap() - 100.0).abs() < 1e-12);
        }
    }
}
