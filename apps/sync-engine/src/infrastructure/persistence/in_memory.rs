//! In-memory listing repository for tests and dry runs.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::application::ports::{ListingRepository, RepositoryError};
use crate::domain::listing::{ListingPatch, ListingRecord};
use crate::domain::shared::SkuId;
use crate::domain::sync::CycleSummary;

/// In-memory implementation of `ListingRepository`.
///
/// Suitable for testing and development. Not durable.
#[derive(Debug, Default)]
pub struct InMemoryListingRepository {
    records: RwLock<HashMap<SkuId, ListingRecord>>,
    cycles: RwLock<Vec<CycleSummary>>,
}

impl InMemoryListingRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded with records.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = ListingRecord>) -> Self {
        let repository = Self::new();
        {
            let mut map = repository.records.write();
            for record in records {
                map.insert(record.sku_id.clone(), record);
            }
        }
        repository
    }

    /// Get the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Cycle summaries recorded so far, oldest first.
    #[must_use]
    pub fn cycles(&self) -> Vec<CycleSummary> {
        self.cycles.read().clone()
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn find_by_sku(&self, sku_id: &SkuId) -> Result<Option<ListingRecord>, RepositoryError> {
        Ok(self.records.read().get(sku_id).cloned())
    }

    async fn update(&self, sku_id: &SkuId, patch: &ListingPatch) -> Result<(), RepositoryError> {
        let mut records = self.records.write();
        let record = records
            .get_mut(sku_id)
            .ok_or_else(|| RepositoryError::NotFound {
                sku_id: sku_id.clone(),
            })?;
        patch.apply_to(record);
        Ok(())
    }

    async fn insert(&self, record: ListingRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.write();
        if records.contains_key(&record.sku_id) {
            return Err(RepositoryError::Duplicate {
                sku_id: record.sku_id,
            });
        }
        records.insert(record.sku_id.clone(), record);
        Ok(())
    }

    async fn list_skus(&self) -> Result<Vec<SkuId>, RepositoryError> {
        let mut skus: Vec<SkuId> = self.records.read().keys().cloned().collect();
        skus.sort();
        Ok(skus)
    }

    async fn record_cycle(&self, summary: &CycleSummary) -> Result<(), RepositoryError> {
        self.cycles.write().push(summary.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::ListingState;
    use crate::domain::shared::{CycleId, ListingId};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn record(sku: &str) -> ListingRecord {
        ListingRecord::new(
            SkuId::new(sku),
            ListingId::new(format!("CBT-{sku}")),
            dec!(33.02),
            ListingState::Active,
        )
    }

    #[tokio::test]
    async fn insert_and_find() {
        let repository = InMemoryListingRepository::new();
        repository.insert(record("B01")).await.unwrap();

        let found = repository.find_by_sku(&SkuId::new("B01")).await.unwrap();
        assert_eq!(found, Some(record("B01")));
        assert!(repository.find_by_sku(&SkuId::new("B02")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_insert_fails() {
        let repository = InMemoryListingRepository::with_records([record("B01")]);
        let error = repository.insert(record("B01")).await.unwrap_err();
        assert!(matches!(error, RepositoryError::Duplicate { .. }));
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn update_applies_partial_patch() {
        let repository = InMemoryListingRepository::with_records([record("B01")]);
        let now = Utc::now();
        let patch = ListingPatch {
            current_state: Some(ListingState::Paused),
            last_synced_at: Some(now),
            ..ListingPatch::default()
        };

        repository.update(&SkuId::new("B01"), &patch).await.unwrap();

        let stored = repository.find_by_sku(&SkuId::new("B01")).await.unwrap().unwrap();
        assert_eq!(stored.current_state, ListingState::Paused);
        assert_eq!(stored.current_price, dec!(33.02));
        assert_eq!(stored.last_synced_at, Some(now));
    }

    #[tokio::test]
    async fn update_missing_record_fails() {
        let repository = InMemoryListingRepository::new();
        let error = repository
            .update(&SkuId::new("B01"), &ListingPatch::error("x"))
            .await
            .unwrap_err();
        assert!(matches!(error, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_skus_is_sorted() {
        let repository = InMemoryListingRepository::with_records([record("B03"), record("B01")]);
        let skus = repository.list_skus().await.unwrap();
        assert_eq!(skus, vec![SkuId::new("B01"), SkuId::new("B03")]);
    }

    #[tokio::test]
    async fn records_cycles_in_order() {
        let repository = InMemoryListingRepository::new();
        let now = Utc::now();
        let summary = CycleSummary::from_outcomes(CycleId::generate(), now, now, &[]);
        repository.record_cycle(&summary).await.unwrap();
        assert_eq!(repository.cycles(), vec![summary]);
    }
}
