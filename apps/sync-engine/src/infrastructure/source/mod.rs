//! Source Marketplace Adapters
//!
//! Implementations of `SourceProbePort`.

pub mod amazon;

pub use amazon::{AmazonProbeConfig, AmazonSourceProbe};
