//! Apply Decision Use Case
//!
//! Commits one [`Transition`] for one listing. The destination write and the
//! record update form a single unit: a listing counts as changed only when
//! both succeed. When the write succeeds but persistence fails, only
//! `last_error` is recorded and the destination runs ahead of the record.
//!
//! Transitions that write nothing still read the destination and restore the
//! record's committed price and state when they diverge, so a split write is
//! repaired on the next cycle whatever that cycle decides. `last_error` is
//! cleared only after the destination matches the record.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::ports::{
    AccessToken, DestinationMarketplacePort, ListingRepository, ListingUpdate, MarketplaceError,
    RemoteListing,
};
use crate::application::services::RetryScheduler;
use crate::domain::listing::{ListingPatch, ListingRecord, Transition};
use crate::domain::sync::{SyncDecision, SyncOutcome};
use crate::observability::record_destination_call;

/// Use case applying a decided transition to the destination and the store.
pub struct ApplyDecisionUseCase<M, R>
where
    M: DestinationMarketplacePort,
    R: ListingRepository,
{
    marketplace: Arc<M>,
    repository: Arc<R>,
    dry_run: bool,
}

impl<M, R> ApplyDecisionUseCase<M, R>
where
    M: DestinationMarketplacePort,
    R: ListingRepository,
{
    /// Create a new `ApplyDecisionUseCase`.
    pub const fn new(marketplace: Arc<M>, repository: Arc<R>) -> Self {
        Self {
            marketplace,
            repository,
            dry_run: false,
        }
    }

    /// Report decisions without writing anything.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check if dry-run mode is enabled.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Execute the use case.
    ///
    /// Always returns exactly one outcome. Once started it runs to completion;
    /// cancellation is only honored between items.
    #[tracing::instrument(
        skip(self, record, transition, destination, token),
        fields(sku_id = %record.sku_id, listing_id = %record.listing_id, decision = %transition.decision)
    )]
    pub async fn execute(
        &self,
        record: &ListingRecord,
        transition: Transition,
        destination: &RetryScheduler,
        token: &AccessToken,
        now: DateTime<Utc>,
    ) -> SyncOutcome {
        let outcome = SyncOutcome {
            sku_id: record.sku_id.clone(),
            listing_id: Some(record.listing_id.clone()),
            decision: transition.decision,
            previous_price: Some(record.current_price),
            new_price: transition.target_price,
            reason: transition.reason.clone(),
        };

        if transition.decision == SyncDecision::SkippedError {
            return outcome;
        }

        if self.dry_run {
            return SyncOutcome {
                reason: format!("dry-run: {}", transition.reason),
                ..outcome
            };
        }

        let Some(patch) = transition.commit_patch(now) else {
            return outcome;
        };

        let Some(update) = ListingUpdate::from_transition(&transition) else {
            if let Err(reason) = self.reconcile(record, destination, token).await {
                return Self::skipped(outcome, reason);
            }
            // Sync metadata only; a failure here leaves the listing untouched.
            if let Err(error) = self.repository.update(&record.sku_id, &patch).await {
                tracing::warn!(%error, "Failed to record sync timestamp");
            }
            return outcome;
        };

        if let Err(reason) = self.write_destination(record, &update, destination, token).await {
            return Self::skipped(outcome, reason);
        }

        match self.repository.update(&record.sku_id, &patch).await {
            Ok(()) => {
                tracing::info!(reason = %outcome.reason, "Listing updated");
                outcome
            }
            Err(error) => {
                let reason = format!("destination updated but persistence failed: {error}");
                tracing::error!(%error, "Persistence failed after destination write");
                if let Err(error) = self
                    .repository
                    .update(&record.sku_id, &ListingPatch::error(reason.clone()))
                    .await
                {
                    tracing::error!(%error, "Failed to record last_error");
                }
                Self::skipped(outcome, reason)
            }
        }
    }

    /// Refresh the remote listing and write the update unless it already holds.
    async fn write_destination(
        &self,
        record: &ListingRecord,
        update: &ListingUpdate,
        destination: &RetryScheduler,
        token: &AccessToken,
    ) -> Result<(), String> {
        let remote = self.read_destination(record, destination, token).await?;

        if update.is_satisfied_by(&remote) {
            tracing::debug!("Destination already converged, skipping write");
            return Ok(());
        }

        self.send_update(record, update, destination, token).await
    }

    /// Restore the record's committed price and state where the destination diverges.
    async fn reconcile(
        &self,
        record: &ListingRecord,
        destination: &RetryScheduler,
        token: &AccessToken,
    ) -> Result<(), String> {
        let remote = self.read_destination(record, destination, token).await?;

        let Some(update) = ListingUpdate::restoring(record, &remote) else {
            return Ok(());
        };

        tracing::warn!(
            remote_status = ?remote.status,
            remote_price = %remote.price,
            state = %record.current_state,
            price = %record.current_price,
            "Destination diverged from committed record, restoring"
        );
        self.send_update(record, &update, destination, token).await
    }

    async fn read_destination(
        &self,
        record: &ListingRecord,
        destination: &RetryScheduler,
        token: &AccessToken,
    ) -> Result<RemoteListing, String> {
        let listing_id = &record.listing_id;
        let marketplace = &self.marketplace;

        let remote = destination
            .call("get_listing", || async move {
                let result = marketplace.get_listing(listing_id, token).await;
                record_destination_call("get", destination_result(&result));
                result
            })
            .await
            .map_err(|error| format!("destination read failed: {error}"))?;

        if remote.status.is_closed() {
            tracing::warn!("Listing closed at destination");
            return Err("listing closed at destination".to_string());
        }
        Ok(remote)
    }

    async fn send_update(
        &self,
        record: &ListingRecord,
        update: &ListingUpdate,
        destination: &RetryScheduler,
        token: &AccessToken,
    ) -> Result<(), String> {
        let listing_id = &record.listing_id;
        let marketplace = &self.marketplace;

        destination
            .call("update_listing", || async move {
                let result = marketplace.update_listing(listing_id, update, token).await;
                record_destination_call("update", destination_result(&result));
                result
            })
            .await
            .map_err(|error| {
                tracing::warn!(%error, "Destination write failed");
                format!("destination write failed: {error}")
            })
    }

    fn skipped(outcome: SyncOutcome, reason: String) -> SyncOutcome {
        SyncOutcome {
            decision: SyncDecision::SkippedError,
            new_price: None,
            reason,
            ..outcome
        }
    }
}

fn destination_result<T>(result: &Result<T, MarketplaceError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(error) if error.is_retryable() => "error",
        Err(_) => "rejected",
    }
}
