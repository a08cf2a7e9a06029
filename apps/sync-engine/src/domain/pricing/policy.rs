//! Pricing policy: the configuration inputs of the cost formula.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::DomainError;

/// Fees, tax and markup applied to every source cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    /// When true, no sales tax is added.
    pub tax_exempt: bool,
    /// Sales tax as a percentage of the source price.
    pub tax_pct: Decimal,
    /// Fixed per-item third-party logistics fee.
    pub fulfillment_fee: Decimal,
    /// Markup percentage applied to cost + tax + fee.
    pub markup_pct: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_exempt: false,
            tax_pct: Decimal::new(7, 0),
            fulfillment_fee: Decimal::new(400, 2),
            markup_pct: Decimal::new(30, 0),
        }
    }
}

impl PricingPolicy {
    /// Validate that all components are non-negative.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("tax_pct", self.tax_pct),
            ("fulfillment_fee", self.fulfillment_fee),
            ("markup_pct", self.markup_pct),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(DomainError::invalid_value(field, "must not be negative"));
            }
        }
        Ok(())
    }
}
