//! Amazon Source Adapter
//!
//! Implementation of `SourceProbePort` for Amazon product pages with:
//! - Rotating identities (user-agent, cookie jar, connection pool)
//! - Optional delivery-location step for postal-accurate pricing
//! - Block-page detection that never reports a blocked page as unavailable

mod config;
mod identity;
mod parser;
mod probe;

pub use config::{AmazonProbeConfig, DEFAULT_USER_AGENTS};
pub use identity::{Identity, IdentityPool};
pub use parser::{PageSignals, parse_product_page};
pub use probe::AmazonSourceProbe;
