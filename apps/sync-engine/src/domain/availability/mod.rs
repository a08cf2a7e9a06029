//! Availability Bounded Context
//!
//! Source snapshots and the classifier that turns them into verdicts.
//! Page structure never leaks past [`SourceSnapshot`].

mod classifier;
mod snapshot;

pub use classifier::{AvailabilityClassifier, Verdict};
pub use snapshot::{AvailabilitySignal, SourceSnapshot};
