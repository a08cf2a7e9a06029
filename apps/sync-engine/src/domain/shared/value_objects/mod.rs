//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.

mod identifiers;

pub use identifiers::{CycleId, ListingId, SkuId, VARIANT_SEPARATOR};
