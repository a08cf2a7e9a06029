//! Listing Bounded Context
//!
//! Durable listing records and the state machine deciding their transitions.

mod record;
mod state_machine;

pub use record::{ListingPatch, ListingRecord, ListingState};
pub use state_machine::{CLOSED_REASON, ListingStateMachine, Transition};
