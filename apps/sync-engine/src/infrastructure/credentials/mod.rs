//! Credential Providers
//!
//! Implementations of `CredentialProvider`.

mod static_token;
mod token_file;

use async_trait::async_trait;

pub use static_token::StaticCredentialProvider;
pub use token_file::FileCredentialProvider;

use crate::application::ports::{AccessToken, CredentialError, CredentialProvider};

/// Provider selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredCredentials {
    /// Fixed token.
    Static(StaticCredentialProvider),
    /// Token file.
    File(FileCredentialProvider),
}

#[async_trait]
impl CredentialProvider for ConfiguredCredentials {
    async fn access_token(&self) -> Result<AccessToken, CredentialError> {
        match self {
            Self::Static(provider) => provider.access_token().await,
            Self::File(provider) => provider.access_token().await,
        }
    }
}
