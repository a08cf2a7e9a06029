//! HTTP client wrapper for the item API.
//!
//! Performs a single attempt per call; retries belong to the caller's
//! retry scheduler so the circuit breaker sees every failure.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_types::ApiErrorResponse;
use super::config::MercadoLibreConfig;
use crate::application::ports::{AccessToken, MarketplaceError};

/// Bearer-authenticated JSON client.
#[derive(Debug, Clone)]
pub struct MercadoLibreHttpClient {
    client: Client,
    config: MercadoLibreConfig,
}

impl MercadoLibreHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: MercadoLibreConfig) -> Result<Self, MarketplaceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MarketplaceError::Connection {
                message: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    /// Get the adapter configuration.
    #[must_use]
    pub const fn config(&self) -> &MercadoLibreConfig {
        &self.config
    }

    /// `GET` a JSON resource.
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &AccessToken,
    ) -> Result<T, MarketplaceError> {
        let request = self.client.get(url).bearer_auth(token.as_str());
        let text = Self::send(request).await?;
        serde_json::from_str(&text).map_err(|e| MarketplaceError::Decode {
            message: e.to_string(),
        })
    }

    /// `PUT` a JSON body, discarding the response body.
    pub async fn put<B: Serialize + Sync>(
        &self,
        url: &str,
        body: &B,
        token: &AccessToken,
    ) -> Result<(), MarketplaceError> {
        let request = self.client.put(url).bearer_auth(token.as_str()).json(body);
        Self::send(request).await.map(|_| ())
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<String, MarketplaceError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if status.is_success() {
            return Ok(body);
        }

        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .ok()
            .and_then(ApiErrorResponse::describe)
            .unwrap_or(body);
        Err(categorize_status(status, message))
    }
}

/// Map an error status to a marketplace error.
fn categorize_status(status: StatusCode, message: String) -> MarketplaceError {
    match status.as_u16() {
        429 => MarketplaceError::RateLimited,
        408 => MarketplaceError::Timeout { message },
        code @ 500..=599 => MarketplaceError::ServerError {
            status: code,
            message,
        },
        code => MarketplaceError::Rejected {
            status: code,
            message,
        },
    }
}

fn map_transport_error(error: reqwest::Error) -> MarketplaceError {
    if error.is_timeout() {
        MarketplaceError::Timeout {
            message: error.to_string(),
        }
    } else if error.is_decode() {
        MarketplaceError::Decode {
            message: error.to_string(),
        }
    } else {
        MarketplaceError::Connection {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorize_rate_limited() {
        assert_eq!(
            categorize_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            MarketplaceError::RateLimited
        );
    }

    #[test]
    fn categorize_server_errors_are_retryable() {
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            let error = categorize_status(status, "down".to_string());
            assert!(matches!(error, MarketplaceError::ServerError { .. }));
            assert!(error.is_retryable());
        }
    }

    #[test]
    fn categorize_client_errors_are_rejections() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
        ] {
            let error = categorize_status(status, "no".to_string());
            assert!(matches!(error, MarketplaceError::Rejected { .. }));
            assert!(!error.is_retryable());
        }
    }

    #[test]
    fn categorize_request_timeout() {
        let error = categorize_status(StatusCode::REQUEST_TIMEOUT, "slow".to_string());
        assert!(error.is_retryable());
    }
}
