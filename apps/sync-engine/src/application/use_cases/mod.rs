//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod apply_decision;
mod sync_orchestrator;

pub use apply_decision::ApplyDecisionUseCase;
pub use sync_orchestrator::{SyncError, SyncOrchestrator, SyncSettings};
