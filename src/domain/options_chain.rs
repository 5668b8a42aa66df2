//! Options chain analysis.
//!
//! Picks the at-the-money contract pair of the nearest listed expiry, prices
//! its Greeks and summarizes put/call activity across the whole chain.

use crate::domain::error::QuantError;
use crate::domain::greeks::{OptionGreeks, OptionKind, PricingInputs};
use crate::domain::outcome::StageOutcome;
use crate::ports::data_port::MarketDataPort;
use crate::ports::pricing_port::OptionsPricingModel;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MIN_DAYS_TO_EXPIRY: i64 = 1;
pub const MAX_DAYS_TO_EXPIRY: i64 = 365;
pub const FALLBACK_VOLATILITY: f64 = 0.25;
const CANDIDATE_EXPIRIES: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionRow {
    pub strike: f64,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub open_interest: Option<f64>,
    #[serde(default)]
    pub implied_volatility: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    #[serde(default)]
    pub calls: Vec<OptionRow>,
    #[serde(default)]
    pub puts: Vec<OptionRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmGreeks {
    pub call_delta: f64,
    pub call_gamma: f64,
    pub call_vega: f64,
    pub call_theta: f64,
    pub put_delta: f64,
    pub put_gamma: f64,
    pub put_vega: f64,
    pub put_theta: f64,
}

impl AtmGreeks {
    pub fn from_pair(call: OptionGreeks, put: OptionGreeks) -> Self {
        Self {
            call_delta: call.delta,
            call_gamma: call.gamma,
            call_vega: call.vega,
            call_theta: call.theta,
            put_delta: put.delta,
            put_gamma: put.gamma,
            put_vega: put.vega,
            put_theta: put.theta,
        }
    }
}

/// Metrics that need both an ATM call and an ATM put row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmDetail {
    pub call_iv: Option<f64>,
    pub put_iv: Option<f64>,
    #[serde(flatten)]
    pub greeks: Option<AtmGreeks>,
    pub put_call_volume_ratio: f64,
    pub put_call_oi_ratio: f64,
    pub atm_total_volume: f64,
    pub atm_total_oi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmContract {
    pub nearest_expiry: NaiveDate,
    pub atm_strike: f64,
    #[serde(flatten)]
    pub detail: Option<AtmDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionsMetricSet {
    pub options_data_available: bool,
    #[serde(flatten)]
    pub contract: Option<AtmContract>,
}

impl OptionsMetricSet {
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn detail(&self) -> Option<&AtmDetail> {
        self.contract.as_ref().and_then(|c| c.detail.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryCandidate {
    pub expiry: NaiveDate,
    pub days_to_expiry: i64,
}

/// Expirations inside the tradable window, nearest first, at most two.
pub fn select_expirations(expirations: &[NaiveDate], as_of: NaiveDate) -> Vec<ExpiryCandidate> {
    let mut candidates: Vec<ExpiryCandidate> = expirations
        .iter()
        .map(|&expiry| ExpiryCandidate {
            expiry,
            days_to_expiry: (expiry - as_of).num_days(),
        })
        .filter(|c| (MIN_DAYS_TO_EXPIRY..=MAX_DAYS_TO_EXPIRY).contains(&c.days_to_expiry))
        .collect();
    candidates.sort_by_key(|c| c.days_to_expiry);
    candidates.truncate(CANDIDATE_EXPIRIES);
    candidates
}

/// Strike closest to `spot` over call strikes then put strikes, first one
/// winning ties. Non-finite strikes are skipped.
pub fn find_atm_strike(chain: &OptionChain, spot: f64) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;
    let strikes = chain.calls.iter().chain(&chain.puts).map(|r| r.strike);
    for strike in strikes.filter(|s| s.is_finite()) {
        let distance = (strike - spot).abs();
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((strike, distance)),
        }
    }
    best.map(|(strike, _)| strike)
}

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn total(rows: &[OptionRow], field: impl Fn(&OptionRow) -> Option<f64>) -> f64 {
    rows.iter().filter_map(&field).filter(|v| v.is_finite()).sum()
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Mean of both IVs when both are reported and non-zero, else the fallback.
pub fn greeks_volatility(call_iv: Option<f64>, put_iv: Option<f64>) -> f64 {
    match (call_iv, put_iv) {
        (Some(c), Some(p)) if c != 0.0 && p != 0.0 => (c + p) / 2.0,
        _ => FALLBACK_VOLATILITY,
    }
}

pub struct OptionsChainAnalyzer<'a> {
    pub data: &'a dyn MarketDataPort,
    pub pricing: &'a dyn OptionsPricingModel,
    pub risk_free_rate: f64,
}

impl OptionsChainAnalyzer<'_> {
    pub fn analyze(&self, ticker: &str, spot: f64, as_of: NaiveDate) -> StageOutcome<OptionsMetricSet> {
        let expirations = match self.data.option_expirations(ticker) {
            Ok(e) => e,
            Err(e) => {
                return StageOutcome::with_warning(
                    OptionsMetricSet::unavailable(),
                    format!("Failed to fetch option expirations: {e}"),
                );
            }
        };
        if expirations.is_empty() {
            debug!(ticker, "no options listed");
            return StageOutcome::clean(OptionsMetricSet::unavailable());
        }

        let candidates = select_expirations(&expirations, as_of);
        let Some(nearest) = candidates.first().copied() else {
            debug!(ticker, listed = expirations.len(), "no expiration inside trading window");
            return StageOutcome::clean(OptionsMetricSet::unavailable());
        };
        if let Some(next) = candidates.get(1) {
            debug!(ticker, expiry = %next.expiry, days = next.days_to_expiry, "second expiry retained, not analysed");
        }

        match self.analyze_expiry(ticker, spot, nearest) {
            Ok(outcome) => outcome,
            Err(e) => StageOutcome::with_warning(
                OptionsMetricSet::unavailable(),
                format!("Error processing options chain: {e}"),
            ),
        }
    }

    fn analyze_expiry(
        &self,
        ticker: &str,
        spot: f64,
        candidate: ExpiryCandidate,
    ) -> Result<StageOutcome<OptionsMetricSet>, QuantError> {
        let chain = self.data.option_chain(ticker, candidate.expiry)?;
        let atm_strike = find_atm_strike(&chain, spot)
            .ok_or_else(|| QuantError::calculation("atm strike", "option chain has no usable strikes"))?;

        let mut outcome = StageOutcome::clean(OptionsMetricSet {
            options_data_available: true,
            contract: Some(AtmContract {
                nearest_expiry: candidate.expiry,
                atm_strike,
                detail: None,
            }),
        });

        let call = chain.calls.iter().find(|r| r.strike == atm_strike);
        let put = chain.puts.iter().find(|r| r.strike == atm_strike);
        let (Some(call), Some(put)) = (call, put) else {
            return Ok(outcome);
        };

        let call_iv = finite(call.implied_volatility);
        let put_iv = finite(put.implied_volatility);

        let inputs = PricingInputs {
            spot,
            strike: atm_strike,
            time_to_expiry: candidate.days_to_expiry as f64 / 365.0,
            rate: self.risk_free_rate,
            volatility: greeks_volatility(call_iv, put_iv),
        };
        let greeks = match self.price_pair(&inputs) {
            Ok(g) => Some(g),
            Err(e) => {
                outcome.warn(format!("Error calculating Greeks: {e}"));
                None
            }
        };

        let atm_volume = |r: &OptionRow| finite(r.volume).unwrap_or(0.0);
        let atm_oi = |r: &OptionRow| finite(r.open_interest).unwrap_or(0.0);

        let detail = AtmDetail {
            call_iv,
            put_iv,
            greeks,
            put_call_volume_ratio: safe_ratio(
                total(&chain.puts, |r| r.volume),
                total(&chain.calls, |r| r.volume),
            ),
            put_call_oi_ratio: safe_ratio(
                total(&chain.puts, |r| r.open_interest),
                total(&chain.calls, |r| r.open_interest),
            ),
            atm_total_volume: atm_volume(call) + atm_volume(put),
            atm_total_oi: atm_oi(call) + atm_oi(put),
        };

        if let Some(contract) = outcome.value.contract.as_mut() {
            contract.detail = Some(detail);
        }
        Ok(outcome)
    }

    fn price_pair(&self, inputs: &PricingInputs) -> Result<AtmGreeks, QuantError> {
        let call = self.pricing.greeks(OptionKind::Call, inputs)?;
        let put = self.pricing.greeks(OptionKind::Put, inputs)?;
        Ok(AtmGreeks::from_pair(call, put))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(strike: f64, volume: Option<f64>) -> OptionRow {
        OptionRow {
            strike,
            volume,
            open_interest: None,
            implied_volatility: None,
        }
    }

    #[test]
    fn select_filters_window_and_sorts() {
        let as_of = d(2026, 10, 19);
        let listed = [
            d(2026, 12, 18),
            d(2026, 10, 19), // 0 days
            d(2026, 10, 23),
            d(2028, 1, 21), // > 365 days
            d(2026, 11, 20),
        ];
        let picked = select_expirations(&listed, as_of);
        assert_eq!(
            picked,
            vec![
                ExpiryCandidate { expiry: d(2026, 10, 23), days_to_expiry: 4 },
                ExpiryCandidate { expiry: d(2026, 11, 20), days_to_expiry: 32 },
            ]
        );
    }

    #[test]
    fn select_window_is_inclusive() {
        let as_of = d(2026, 1, 1);
        let picked = select_expirations(&[d(2027, 1, 1), d(2026, 1, 2)], as_of);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].days_to_expiry, 1);
        assert_eq!(picked[1].days_to_expiry, 365);
    }

    #[test]
    fn atm_strike_closest_to_spot() {
        let chain = OptionChain {
            calls: vec![row(95.0, None), row(100.0, None), row(105.0, None)],
            puts: vec![],
        };
        assert_eq!(find_atm_strike(&chain, 101.0), Some(100.0));
    }

    #[test]
    fn atm_strike_tie_takes_first_seen() {
        let chain = OptionChain {
            calls: vec![row(102.0, None)],
            puts: vec![row(98.0, None)],
        };
        assert_eq!(find_atm_strike(&chain, 100.0), Some(102.0));
    }

    #[test]
    fn atm_strike_searches_put_only_strikes() {
        let chain = OptionChain {
            calls: vec![row(90.0, None)],
            puts: vec![row(100.0, None)],
        };
        assert_eq!(find_atm_strike(&chain, 99.0), Some(100.0));
        assert_eq!(find_atm_strike(&OptionChain::default(), 99.0), None);
    }

    #[test]
    fn atm_strike_skips_non_finite_strikes() {
        let chain = OptionChain {
            calls: vec![row(100.0, None), row(f64::NAN, None), row(150.0, None)],
            puts: vec![row(f64::INFINITY, None)],
        };
        assert_eq!(find_atm_strike(&chain, 101.0), Some(100.0));

        let unusable = OptionChain {
            calls: vec![row(f64::NAN, None)],
            puts: vec![],
        };
        assert_eq!(find_atm_strike(&unusable, 101.0), None);
    }

    #[test]
    fn ratio_with_zero_denominator_is_zero() {
        assert_eq!(safe_ratio(500.0, 0.0), 0.0);
        assert_eq!(safe_ratio(300.0, 200.0), 1.5);
    }

    #[test]
    fn volatility_fallback_rules() {
        assert_eq!(greeks_volatility(Some(0.3), Some(0.2)), 0.25);
        assert_eq!(greeks_volatility(Some(0.4), Some(0.2)), (0.4 + 0.2) / 2.0);
        assert_eq!(greeks_volatility(Some(0.4), None), FALLBACK_VOLATILITY);
        assert_eq!(greeks_volatility(Some(0.0), Some(0.3)), FALLBACK_VOLATILITY);
    }

    #[test]
    fn unavailable_serializes_single_flag() {
        let json = serde_json::to_value(OptionsMetricSet::unavailable()).unwrap();
        assert_eq!(json, serde_json::json!({ "options_data_available": false }));
    }

    #[test]
    fn contract_without_detail_serializes_strike_only() {
        let set = OptionsMetricSet {
            options_data_available: true,
            contract: Some(AtmContract {
                nearest_expiry: d(2026, 11, 20),
                atm_strike: 100.0,
                detail: None,
            }),
        };
        let json = serde_json::to_value(set).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "options_data_available": true,
                "nearest_expiry": "2026-11-20",
                "atm_strike": 100.0
            })
        );
    }

    #[test]
    fn chain_rows_read_provider_keys() {
        let raw = r#"{"strike": 100.0, "volume": 12, "openInterest": 340, "impliedVolatility": 0.31}"#;
        let parsed: OptionRow = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.open_interest, Some(340.0));
        assert_eq!(parsed.implied_volatility, Some(0.31));
    }
}
