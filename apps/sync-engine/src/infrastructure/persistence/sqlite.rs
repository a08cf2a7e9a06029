//! SQLite listing repository.
//!
//! One connection guarded by a mutex; every call runs on the blocking pool.
//! Prices are stored as decimal text so no precision is lost.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::application::ports::{ListingRepository, RepositoryError};
use crate::domain::listing::{ListingPatch, ListingRecord, ListingState};
use crate::domain::shared::{ListingId, SkuId};
use crate::domain::sync::CycleSummary;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS listings (
    sku_id          TEXT PRIMARY KEY,
    listing_id      TEXT NOT NULL,
    current_price   TEXT NOT NULL,
    current_state   TEXT NOT NULL,
    last_synced_at  TEXT,
    last_error      TEXT
);

CREATE TABLE IF NOT EXISTS sync_runs (
    cycle_id        TEXT PRIMARY KEY,
    started_at      TEXT NOT NULL,
    finished_at     TEXT NOT NULL,
    total_items     INTEGER NOT NULL,
    no_change       INTEGER NOT NULL,
    price_updated   INTEGER NOT NULL,
    paused          INTEGER NOT NULL,
    reactivated     INTEGER NOT NULL,
    errors          INTEGER NOT NULL,
    cancelled       INTEGER NOT NULL
);
";

/// SQLite implementation of `ListingRepository`.
#[derive(Debug, Clone)]
pub struct SqliteListingRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteListingRepository {
    /// Open (or create) a database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path.as_ref()).map_err(storage)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory().map_err(storage)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch(SCHEMA).map_err(storage)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Number of recorded cycles.
    pub async fn cycle_count(&self) -> Result<u64, RepositoryError> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM sync_runs", [], |row| row.get(0))?;
            Ok(u64::try_from(count).unwrap_or_default())
        })
        .await
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Connection) -> Result<T, RepositoryError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            f(&mut guard)
        })
        .await
        .map_err(|e| RepositoryError::storage(format!("blocking task failed: {e}")))?
    }
}

fn storage(error: rusqlite::Error) -> RepositoryError {
    RepositoryError::storage(error.to_string())
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(error: rusqlite::Error) -> Self {
        storage(error)
    }
}

/// Raw column values of one `listings` row.
struct ListingRow {
    sku_id: String,
    listing_id: String,
    current_price: String,
    current_state: String,
    last_synced_at: Option<String>,
    last_error: Option<String>,
}

impl TryFrom<ListingRow> for ListingRecord {
    type Error = RepositoryError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let current_price = Decimal::from_str(&row.current_price)
            .map_err(|e| RepositoryError::storage(format!("bad price for {}: {e}", row.sku_id)))?;
        let current_state = ListingState::from_str(&row.current_state)
            .map_err(|e| RepositoryError::storage(e.to_string()))?;
        let last_synced_at = row
            .last_synced_at
            .map(|text| {
                DateTime::parse_from_rfc3339(&text)
                    .map(|at| at.with_timezone(&Utc))
                    .map_err(|e| RepositoryError::storage(format!("bad timestamp: {e}")))
            })
            .transpose()?;

        Ok(Self {
            sku_id: SkuId::new(row.sku_id),
            listing_id: ListingId::new(row.listing_id),
            current_price,
            current_state,
            last_synced_at,
            last_error: row.last_error,
        })
    }
}

fn count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl ListingRepository for SqliteListingRepository {
    async fn find_by_sku(&self, sku_id: &SkuId) -> Result<Option<ListingRecord>, RepositoryError> {
        let key = sku_id.as_str().to_string();
        let row = self
            .with_conn(move |conn| {
                let row = conn
                    .query_row(
                        "SELECT sku_id, listing_id, current_price, current_state,
                                last_synced_at, last_error
                         FROM listings WHERE sku_id = ?1",
                        params![key],
                        |row| {
                            Ok(ListingRow {
                                sku_id: row.get(0)?,
                                listing_id: row.get(1)?,
                                current_price: row.get(2)?,
                                current_state: row.get(3)?,
                                last_synced_at: row.get(4)?,
                                last_error: row.get(5)?,
                            })
                        },
                    )
                    .optional()?;
                Ok(row)
            })
            .await?;
        row.map(ListingRecord::try_from).transpose()
    }

    async fn update(&self, sku_id: &SkuId, patch: &ListingPatch) -> Result<(), RepositoryError> {
        let key = sku_id.clone();
        let price = patch.current_price.map(|p| p.to_string());
        let state = patch.current_state.map(|s| s.as_str().to_string());
        let synced_at = patch.last_synced_at.map(|at| at.to_rfc3339());
        let set_error = patch.last_error.is_some();
        let error = patch.last_error.clone().flatten();

        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE listings SET
                    current_price  = COALESCE(?2, current_price),
                    current_state  = COALESCE(?3, current_state),
                    last_synced_at = COALESCE(?4, last_synced_at),
                    last_error     = CASE WHEN ?5 THEN ?6 ELSE last_error END
                 WHERE sku_id = ?1",
                params![key.as_str(), price, state, synced_at, set_error, error],
            )?;
            if changed == 0 {
                return Err(RepositoryError::NotFound { sku_id: key });
            }
            Ok(())
        })
        .await
    }

    async fn insert(&self, record: ListingRecord) -> Result<(), RepositoryError> {
        self.with_conn(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO listings
                    (sku_id, listing_id, current_price, current_state, last_synced_at, last_error)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.sku_id.as_str(),
                    record.listing_id.as_str(),
                    record.current_price.to_string(),
                    record.current_state.as_str(),
                    record.last_synced_at.map(|at| at.to_rfc3339()),
                    record.last_error,
                ],
            )?;
            if inserted == 0 {
                return Err(RepositoryError::Duplicate {
                    sku_id: record.sku_id,
                });
            }
            Ok(())
        })
        .await
    }

    async fn list_skus(&self) -> Result<Vec<SkuId>, RepositoryError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT sku_id FROM listings ORDER BY sku_id")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            let mut skus = Vec::new();
            for row in rows {
                skus.push(SkuId::new(row?));
            }
            Ok(skus)
        })
        .await
    }

    async fn record_cycle(&self, summary: &CycleSummary) -> Result<(), RepositoryError> {
        let summary = summary.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO sync_runs
                    (cycle_id, started_at, finished_at, total_items, no_change,
                     price_updated, paused, reactivated, errors, cancelled)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    summary.cycle_id.as_str(),
                    summary.started_at.to_rfc3339(),
                    summary.finished_at.to_rfc3339(),
                    count(summary.total_items),
                    count(summary.no_change),
                    count(summary.price_updated),
                    count(summary.paused),
                    count(summary.reactivated),
                    count(summary.errors),
                    count(summary.cancelled),
                ],
            )?;
            Ok(())
        })
        .await
    }
}
