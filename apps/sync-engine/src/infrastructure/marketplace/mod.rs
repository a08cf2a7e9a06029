//! Destination Marketplace Adapters
//!
//! Implementations of `DestinationMarketplacePort`.

pub mod mercadolibre;

pub use mercadolibre::{MercadoLibreAdapter, MercadoLibreConfig};
