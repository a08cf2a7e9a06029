//! MercadoLibre Destination Adapter
//!
//! Implementation of `DestinationMarketplacePort` for the MercadoLibre item
//! API with bearer-token auth. Single attempt per call; retry, backoff and
//! circuit breaking are applied by the caller.

mod adapter;
mod api_types;
mod config;
mod http_client;

pub use adapter::MercadoLibreAdapter;
pub use config::{DEFAULT_BASE_URL, MercadoLibreConfig};
