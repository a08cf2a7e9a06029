//! Pricing Bounded Context
//!
//! Deterministic conversion of a source cost into a destination price.

mod calculator;
mod policy;

pub use calculator::{PRICE_SCALE, PriceCalculator, PriceQuote, round_price};
pub use policy::PricingPolicy;
