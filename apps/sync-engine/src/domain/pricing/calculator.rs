//! Price calculator.
//!
//! `destination_price = round((base_cost + tax + fulfillment_fee) * (1 + markup_pct / 100), 2)`
//!
//! Markup applies to the full landed cost, not to the source price alone.
//! Intermediate values stay unrounded; rounding (half-up) happens once at the
//! end so repeated syncs never drift.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::policy::PricingPolicy;
use crate::domain::availability::SourceSnapshot;
use crate::domain::shared::DomainError;

/// Decimal places of destination prices.
pub const PRICE_SCALE: u32 = 2;

/// Breakdown of a destination price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Source price.
    pub base_cost: Decimal,
    /// Sales tax (zero when tax-exempt).
    pub tax: Decimal,
    /// Per-item logistics fee.
    pub fulfillment_fee: Decimal,
    /// Markup percentage applied.
    pub markup_pct: Decimal,
    /// Final rounded destination price.
    pub destination_price: Decimal,
}

/// Stateless price calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceCalculator;

impl PriceCalculator {
    /// Quote a destination price for a snapshot.
    ///
    /// Fails with [`DomainError::MissingPrice`] when the snapshot has no price;
    /// callers must only quote `AVAILABLE` verdicts.
    pub fn quote(snapshot: &SourceSnapshot, policy: &PricingPolicy) -> Result<PriceQuote, DomainError> {
        let base_cost = snapshot
            .raw_price
            .ok_or_else(|| DomainError::missing_price(snapshot.sku_id.as_str()))?;

        if base_cost.is_sign_negative() && !base_cost.is_zero() {
            return Err(DomainError::invalid_value(
                "raw_price",
                format!("negative source price {base_cost}"),
            ));
        }

        let tax = if policy.tax_exempt {
            Decimal::ZERO
        } else {
            base_cost * policy.tax_pct / Decimal::ONE_HUNDRED
        };

        let landed = base_cost + tax + policy.fulfillment_fee;
        let factor = Decimal::ONE + policy.markup_pct / Decimal::ONE_HUNDRED;
        let destination_price = round_price(landed * factor);

        Ok(PriceQuote {
            base_cost,
            tax,
            fulfillment_fee: policy.fulfillment_fee,
            markup_pct: policy.markup_pct,
            destination_price,
        })
    }
}

/// Round to cents, half away from zero.
#[must_use]
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
