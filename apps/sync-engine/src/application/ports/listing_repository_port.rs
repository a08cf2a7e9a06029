//! Listing Repository Port (Driven Port)
//!
//! Keyed store of [`ListingRecord`]s with partial-field updates.

use async_trait::async_trait;

use crate::domain::listing::{ListingPatch, ListingRecord};
use crate::domain::shared::SkuId;
use crate::domain::sync::CycleSummary;

/// Repository error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// No record for the SKU.
    #[error("Listing not found: {sku_id}")]
    NotFound {
        /// Missing SKU.
        sku_id: SkuId,
    },

    /// A record for the SKU already exists.
    #[error("Listing already exists: {sku_id}")]
    Duplicate {
        /// Conflicting SKU.
        sku_id: SkuId,
    },

    /// Backend failure.
    #[error("Storage error: {message}")]
    Storage {
        /// Error details.
        message: String,
    },
}

impl RepositoryError {
    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Port for listing persistence.
///
/// The sync engine is the only writer.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Point read by SKU.
    async fn find_by_sku(&self, sku_id: &SkuId) -> Result<Option<ListingRecord>, RepositoryError>;

    /// Apply a partial update without clobbering untouched fields.
    async fn update(&self, sku_id: &SkuId, patch: &ListingPatch) -> Result<(), RepositoryError>;

    /// Insert a newly published record.
    async fn insert(&self, record: ListingRecord) -> Result<(), RepositoryError>;

    /// All SKUs in the store, sorted.
    async fn list_skus(&self) -> Result<Vec<SkuId>, RepositoryError>;

    /// Record the summary of a finished cycle.
    async fn record_cycle(&self, _summary: &CycleSummary) -> Result<(), RepositoryError> {
        Ok(())
    }
}
