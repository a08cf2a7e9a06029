//! Listing store configuration.

use serde::{Deserialize, Serialize};

/// Listing store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// SQLite database path.
    pub database_path: String,
    /// Use a process-local store instead of SQLite.
    pub in_memory: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_path: "sync.sqlite3".to_string(),
            in_memory: false,
        }
    }
}
