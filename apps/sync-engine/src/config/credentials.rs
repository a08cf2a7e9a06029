//! Destination credential configuration.

use serde::{Deserialize, Serialize};

/// Where the destination access token comes from.
///
/// `token_file` wins over `access_token` when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// JSON token file with `access_token` and optional `expires_at`.
    pub token_file: Option<String>,
    /// Static access token.
    pub access_token: Option<String>,
}
