//! Token supplied directly through configuration.

use async_trait::async_trait;

use crate::application::ports::{AccessToken, CredentialError, CredentialProvider};

/// Credential provider holding a fixed token.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    token: AccessToken,
}

impl StaticCredentialProvider {
    /// Create a provider for a fixed token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn access_token(&self) -> Result<AccessToken, CredentialError> {
        if self.token.is_blank() {
            return Err(CredentialError::Missing {
                message: "static access token is empty".to_string(),
            });
        }
        Ok(self.token.clone())
    }
}
