//! Fundamental metrics validation.

use crate::domain::outcome::StageOutcome;
use serde::{Deserialize, Serialize};

/// Raw fundamental fields as reported by the data provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    #[serde(rename = "forwardPE", default)]
    pub forward_pe: Option<f64>,
    #[serde(rename = "priceToBook", default)]
    pub price_to_book: Option<f64>,
    #[serde(rename = "dividendYield", default)]
    pub dividend_yield: Option<f64>,
}

/// Validated ratios. A `None` is serialized as an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalMetricSet {
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub dividend_yield: Option<f64>,
}

const FORWARD_PE_MAX: f64 = 1000.0;
const PRICE_TO_BOOK_MAX: f64 = 100.0;

fn accept(
    raw: Option<f64>,
    in_range: impl Fn(f64) -> bool,
    label: &str,
    warnings: &mut Vec<String>,
) -> Option<f64> {
    match raw {
        Some(v) if v.is_finite() && in_range(v) => Some(v),
        Some(v) => {
            warnings.push(format!("Invalid {label}: {v}"));
            None
        }
        None => {
            warnings.push(format!("Missing {label}"));
            None
        }
    }
}

/// Range-checks each field independently; never fails as a whole.
pub fn validate_fundamentals(snapshot: &FundamentalSnapshot) -> StageOutcome<FundamentalMetricSet> {
    let mut warnings = Vec::new();

    let forward_pe = accept(
        snapshot.forward_pe,
        |v| v > 0.0 && v <= FORWARD_PE_MAX,
        "forward P/E ratio",
        &mut warnings,
    );
    let price_to_book = accept(
        snapshot.price_to_book,
        |v| v > 0.0 && v <= PRICE_TO_BOOK_MAX,
        "price-to-book ratio",
        &mut warnings,
    );
    let dividend_yield = accept(
        snapshot.dividend_yield,
        |v| (0.0..=1.0).contains(&v),
        "dividend yield",
        &mut warnings,
    );

    StageOutcome {
        value: FundamentalMetricSet {
            forward_pe,
            price_to_book,
            dividend_yield,
        },
        warnings,
    }
}
