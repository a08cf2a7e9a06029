//! Token read from a JSON file maintained by an external refresh job.
//!
//! The file is re-read on every call so a refreshed token is picked up by
//! the next cycle without a restart.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::application::ports::{AccessToken, CredentialError, CredentialProvider};

/// Tokens expiring within this margin are treated as expired.
const EXPIRY_MARGIN_SECONDS: i64 = 60;

/// On-disk token document.
#[derive(Debug, Clone, Deserialize)]
struct TokenFile {
    access_token: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

/// Credential provider backed by a token file.
#[derive(Debug, Clone)]
pub struct FileCredentialProvider {
    path: PathBuf,
}

impl FileCredentialProvider {
    /// Create a provider reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the token file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check(document: TokenFile, now: DateTime<Utc>) -> Result<AccessToken, CredentialError> {
        let token = AccessToken::new(document.access_token);
        if token.is_blank() {
            return Err(CredentialError::Invalid {
                message: "token file has an empty access_token".to_string(),
            });
        }
        if let Some(expired_at) = document.expires_at
            && expired_at <= now + Duration::seconds(EXPIRY_MARGIN_SECONDS)
        {
            return Err(CredentialError::Expired { expired_at });
        }
        Ok(token)
    }
}

#[async_trait]
impl CredentialProvider for FileCredentialProvider {
    async fn access_token(&self) -> Result<AccessToken, CredentialError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CredentialError::Missing {
                message: format!("{}: {e}", self.path.display()),
            })?;
        let document: TokenFile =
            serde_json::from_str(&raw).map_err(|e| CredentialError::Invalid {
                message: format!("{}: {e}", self.path.display()),
            })?;
        Self::check(document, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_token(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn reads_valid_token() {
        let expires = (Utc::now() + Duration::hours(6)).to_rfc3339();
        let file = write_token(&format!(
            r#"{{"access_token":"APP_USR-file","expires_at":"{expires}"}}"#
        ));

        let token = FileCredentialProvider::new(file.path())
            .access_token()
            .await
            .unwrap();
        assert_eq!(token.as_str(), "APP_USR-file");
    }

    #[tokio::test]
    async fn token_without_expiry_is_accepted() {
        let file = write_token(r#"{"access_token":"APP_USR-forever"}"#);
        assert!(
            FileCredentialProvider::new(file.path())
                .access_token()
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let file = write_token(
            r#"{"access_token":"APP_USR-old","expires_at":"2020-01-01T00:00:00Z"}"#,
        );
        let error = FileCredentialProvider::new(file.path())
            .access_token()
            .await
            .unwrap_err();
        assert!(matches!(error, CredentialError::Expired { .. }));
    }

    #[test]
    fn token_inside_margin_is_expired() {
        let now = Utc::now();
        let document = TokenFile {
            access_token: "APP_USR-soon".to_string(),
            expires_at: Some(now + Duration::seconds(30)),
        };
        assert!(matches!(
            FileCredentialProvider::check(document, now),
            Err(CredentialError::Expired { .. })
        ));
    }

    #[tokio::test]
    async fn missing_file_is_missing_credential() {
        let dir = tempfile::tempdir().unwrap();
        let error = FileCredentialProvider::new(dir.path().join("absent.json"))
            .access_token()
            .await
            .unwrap_err();
        assert!(matches!(error, CredentialError::Missing { .. }));
    }

    #[tokio::test]
    async fn malformed_file_is_invalid() {
        let file = write_token("not json");
        let error = FileCredentialProvider::new(file.path())
            .access_token()
            .await
            .unwrap_err();
        assert!(matches!(error, CredentialError::Invalid { .. }));
    }
}
