//! Sync Bounded Context
//!
//! Outcomes of individual items and the aggregate of a whole cycle.

mod outcome;
mod summary;

pub use outcome::{SyncDecision, SyncOutcome};
pub use summary::{CANCELLED_REASON, CycleSummary};
