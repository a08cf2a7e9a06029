//! Infrastructure Layer
//!
//! This module contains all adapters (implementations) for the ports defined
//! in the application layer. Following hexagonal architecture:
//!
//! - `source/`: Source marketplace probe (Amazon product pages)
//! - `marketplace/`: Destination marketplace API (MercadoLibre items)
//! - `credentials/`: Destination access-token providers
//! - `persistence/`: Listing stores (in-memory, SQLite)
//! - `notification/`: Cycle summary sinks (log, webhook)
//! - `container`: Wiring of all adapters from configuration

mod container;
pub mod credentials;
pub mod marketplace;
pub mod notification;
pub mod persistence;
pub mod source;

pub use container::{Container, EngineOrchestrator, WiringError};
