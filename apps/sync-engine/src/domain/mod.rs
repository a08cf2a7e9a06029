//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Value Objects**: Identifiers and immutable snapshots with equality by value
//! - **Domain Services**: Stateless classification, pricing, and transition rules
//! - **Records**: Listing state persisted by adapters
//!
//! # Bounded Contexts
//!
//! - [`availability`]: Source snapshots and availability classification
//! - [`pricing`]: Pricing policy and deterministic destination quotes
//! - [`listing`]: Listing records and the transition state machine
//! - [`sync`]: Per-item outcomes and cycle summaries

pub mod availability;
pub mod listing;
pub mod pricing;
pub mod shared;
pub mod sync;
