//! Black-Scholes analytic Greeks for European options.
//!
//! Conventions: delta and gamma are raw partial derivatives, vega is per one
//! volatility point (÷100) and theta is per calendar day (÷365).

use crate::domain::error::QuantError;
use crate::ports::pricing_port::OptionsPricingModel;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingInputs {
    pub spot: f64,
    pub strike: f64,
    /// Years to expiry (calendar days / 365).
    pub time_to_expiry: f64,
    pub rate: f64,
    pub volatility: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionGreeks {
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
}

/// Abramowitz & Stegun 7.1.26, max error 1.5e-7.
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = x.signum();
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

fn check_inputs(inputs: &PricingInputs) -> Result<(), QuantError> {
    let fields = [
        ("spot", inputs.spot),
        ("strike", inputs.strike),
        ("time to expiry", inputs.time_to_expiry),
        ("volatility", inputs.volatility),
    ];
    for (name, value) in fields {
        if !value.is_finite() || value <= 0.0 {
            return Err(QuantError::calculation(
                "greeks",
                format!("{name} must be positive, got {value}"),
            ));
        }
    }
    if !inputs.rate.is_finite() {
        return Err(QuantError::calculation("greeks", "rate must be finite"));
    }
    Ok(())
}

/// Closed-form Black-Scholes-Merton model without dividends.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackScholesModel;

impl OptionsPricingModel for BlackScholesModel {
    fn greeks(&self, kind: OptionKind, inputs: &PricingInputs) -> Result<OptionGreeks, QuantError> {
        check_inputs(inputs)?;
        let PricingInputs {
            spot: s,
            strike: k,
            time_to_expiry: t,
            rate: r,
            volatility: sigma,
        } = *inputs;

        let sqrt_t = t.sqrt();
        let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * sqrt_t);
        let d2 = d1 - sigma * sqrt_t;
        let pdf_d1 = norm_pdf(d1);
        let discount = (-r * t).exp();

        let gamma = pdf_d1 / (s * sigma * sqrt_t);
        let vega = s * pdf_d1 * sqrt_t / 100.0;
        let decay = -(s * pdf_d1 * sigma) / (2.0 * sqrt_t);

        let (delta, annual_theta) = match kind {
            OptionKind::Call => (norm_cdf(d1), decay - r * k * discount * norm_cdf(d2)),
            OptionKind::Put => (norm_cdf(d1) - 1.0, decay + r * k * discount * norm_cdf(-d2)),
        };

        let greeks = OptionGreeks {
            delta,
            gamma,
            vega,
            theta: annual_theta / 365.0,
        };
        if [greeks.delta, greeks.gamma, greeks.vega, greeks.theta]
            .iter()
            .all(|v| v.is_finite())
        {
            Ok(greeks)
        } else {
            Err(QuantError::calculation("greeks", "non-finite result"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn atm(days: f64) -> PricingInputs {
        PricingInputs {
            spot: 100.0,
            strike: 100.0,
            time_to_expiry: days / 365.0,
            rate: 0.02,
            volatility: 0.25,
        }
    }

    #[test]
    fn norm_cdf_reference_points() {
        assert_abs_diff_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-7);
        assert_abs_diff_eq!(norm_cdf(1.96), 0.9750021, epsilon = 1e-6);
        assert_abs_diff_eq!(norm_cdf(-1.0), 0.1586553, epsilon = 1e-6);
    }

    #[test]
    fn one_year_atm_call_reference() {
        // S=K=100, T=1, r=0.05, σ=0.2: d1 = 0.35, d2 = 0.15
        let inputs = PricingInputs {
            spot: 100.0,
            strike: 100.0,
            time_to_expiry: 1.0,
            rate: 0.05,
            volatility: 0.2,
        };
        let call = BlackScholesModel.greeks(OptionKind::Call, &inputs).unwrap();
        assert_abs_diff_eq!(call.delta, 0.636831, epsilon = 1e-5);
        assert_abs_diff_eq!(call.gamma, 0.018762, epsilon = 1e-5);
        assert_abs_diff_eq!(call.vega, 0.375240, epsilon = 1e-5);
        assert_abs_diff_eq!(call.theta, -6.414028 / 365.0, epsilon = 1e-5);
    }

    #[test]
    fn put_call_parity_of_delta() {
        let inputs = atm(30.0);
        let call = BlackScholesModel.greeks(OptionKind::Call, &inputs).unwrap();
        let put = BlackScholesModel.greeks(OptionKind::Put, &inputs).unwrap();
        assert_abs_diff_eq!(call.delta - put.delta, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(call.gamma, put.gamma, epsilon = 1e-15);
        assert_abs_diff_eq!(call.vega, put.vega, epsilon = 1e-15);
        assert!(call.theta < 0.0);
    }

    #[test]
    fn rejects_non_positive_inputs() {
        let mut inputs = atm(30.0);
        inputs.volatility = 0.0;
        let err = BlackScholesModel.greeks(OptionKind::Call, &inputs).unwrap_err();
        assert!(matches!(err, QuantError::CalculationFailure { .. }));

        let mut inputs = atm(30.0);
        inputs.time_to_expiry = 0.0;
        assert!(BlackScholesModel.greeks(OptionKind::Put, &inputs).is_err());

        let mut inputs = atm(30.0);
        inputs.spot = f64::NAN;
        assert!(BlackScholesModel.greeks(OptionKind::Put, &inputs).is_err());
    }
}
