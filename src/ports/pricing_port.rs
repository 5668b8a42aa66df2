//! Option pricing model port.

use crate::domain::error::QuantError;
use crate::domain::greeks::{OptionGreeks, OptionKind, PricingInputs};

/// Analytic Greeks for a European contract.
pub trait OptionsPricingModel: Send + Sync {
    fn greeks(&self, kind: OptionKind, inputs: &PricingInputs) -> Result<OptionGreeks, QuantError>;
}
