//! Listing persistence adapters.

mod in_memory;
mod sqlite;

use async_trait::async_trait;

pub use in_memory::InMemoryListingRepository;
pub use sqlite::SqliteListingRepository;

use crate::application::ports::{ListingRepository, RepositoryError};
use crate::domain::listing::{ListingPatch, ListingRecord};
use crate::domain::shared::SkuId;
use crate::domain::sync::CycleSummary;

/// Store selected by configuration.
#[derive(Debug)]
pub enum ConfiguredRepository {
    /// Process-local store.
    InMemory(InMemoryListingRepository),
    /// SQLite file.
    Sqlite(SqliteListingRepository),
}

#[async_trait]
impl ListingRepository for ConfiguredRepository {
    async fn find_by_sku(&self, sku_id: &SkuId) -> Result<Option<ListingRecord>, RepositoryError> {
        match self {
            Self::InMemory(store) => store.find_by_sku(sku_id).await,
            Self::Sqlite(store) => store.find_by_sku(sku_id).await,
        }
    }

    async fn update(&self, sku_id: &SkuId, patch: &ListingPatch) -> Result<(), RepositoryError> {
        match self {
            Self::InMemory(store) => store.update(sku_id, patch).await,
            Self::Sqlite(store) => store.update(sku_id, patch).await,
        }
    }

    async fn insert(&self, record: ListingRecord) -> Result<(), RepositoryError> {
        match self {
            Self::InMemory(store) => store.insert(record).await,
            Self::Sqlite(store) => store.insert(record).await,
        }
    }

    async fn list_skus(&self) -> Result<Vec<SkuId>, RepositoryError> {
        match self {
            Self::InMemory(store) => store.list_skus().await,
            Self::Sqlite(store) => store.list_skus().await,
        }
    }

    async fn record_cycle(&self, summary: &CycleSummary) -> Result<(), RepositoryError> {
        match self {
            Self::InMemory(store) => store.record_cycle(summary).await,
            Self::Sqlite(store) => store.record_cycle(summary).await,
        }
    }
}
