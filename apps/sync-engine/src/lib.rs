// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Sync Engine - Availability & Price Synchronization
//!
//! Mirrors source-marketplace (Amazon) availability and price onto
//! destination-marketplace (MercadoLibre CBT) listings.
//!
//! # Architecture (Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure rules, no I/O
//!   - `availability`: `SourceSnapshot`, `AvailabilityClassifier`
//!   - `pricing`: `PricingPolicy`, `PriceCalculator`
//!   - `listing`: `ListingRecord`, `ListingStateMachine`
//!   - `sync`: `SyncOutcome`, `CycleSummary`
//!
//! - **Application**: Ports, services and use cases
//!   - `ports`: source probe, destination marketplace, listing store,
//!     credentials, notification
//!   - `services`: `RetryScheduler`, `RequestRateLimiter`
//!   - `use_cases`: `ApplyDecisionUseCase`, `SyncOrchestrator`
//!
//! - **Infrastructure**: Adapters
//!   - `source`: Amazon product page probe
//!   - `marketplace`: MercadoLibre item API
//!   - `persistence`: in-memory and SQLite listing stores
//!   - `credentials`, `notification`, `Container`
//!
//! Cross-cutting: `resilience` (circuit breaker), `config`,
//! `observability` (Prometheus), `telemetry` (tracing subscriber).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - Core rules with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Configuration loading and validation.
pub mod config;

/// Prometheus metrics.
pub mod observability;

/// Circuit breaker.
pub mod resilience;

/// Tracing subscriber initialization.
pub mod telemetry;

// Domain re-exports
pub use domain::availability::{AvailabilityClassifier, AvailabilitySignal, SourceSnapshot, Verdict};
pub use domain::listing::{ListingPatch, ListingRecord, ListingState, ListingStateMachine, Transition};
pub use domain::pricing::{PriceCalculator, PriceQuote, PricingPolicy};
pub use domain::shared::{CycleId, DomainError, ListingId, SkuId};
pub use domain::sync::{CycleSummary, SyncDecision, SyncOutcome};

// Application re-exports
pub use application::ports::{
    CredentialProvider, DestinationMarketplacePort, ListingRepository, NotificationPort,
    SourceProbePort,
};
pub use application::services::{RequestRateLimiter, RetryPolicy, RetryScheduler};
pub use application::use_cases::{ApplyDecisionUseCase, SyncError, SyncOrchestrator, SyncSettings};

// Infrastructure re-exports
pub use infrastructure::Container;
pub use infrastructure::persistence::{InMemoryListingRepository, SqliteListingRepository};
