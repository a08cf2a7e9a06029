//! MercadoLibre adapter implementing DestinationMarketplacePort.

use async_trait::async_trait;

use super::api_types::{ItemResponse, ItemUpdateRequest};
use super::config::MercadoLibreConfig;
use super::http_client::MercadoLibreHttpClient;
use crate::application::ports::{
    AccessToken, DestinationMarketplacePort, ListingUpdate, MarketplaceError, RemoteListing,
};
use crate::domain::shared::ListingId;

/// MercadoLibre (CBT Global Selling) item adapter.
#[derive(Debug, Clone)]
pub struct MercadoLibreAdapter {
    client: MercadoLibreHttpClient,
}

impl MercadoLibreAdapter {
    /// Create a new adapter.
    pub fn new(config: MercadoLibreConfig) -> Result<Self, MarketplaceError> {
        Ok(Self {
            client: MercadoLibreHttpClient::new(config)?,
        })
    }
}

#[async_trait]
impl DestinationMarketplacePort for MercadoLibreAdapter {
    #[tracing::instrument(skip(self, token), fields(listing_id = %listing_id))]
    async fn get_listing(
        &self,
        listing_id: &ListingId,
        token: &AccessToken,
    ) -> Result<RemoteListing, MarketplaceError> {
        let url = self.client.config().item_url(listing_id.as_str());
        let item: ItemResponse = self.client.get(&url, token).await?;
        Ok(item.into())
    }

    #[tracing::instrument(skip(self, update, token), fields(listing_id = %listing_id))]
    async fn update_listing(
        &self,
        listing_id: &ListingId,
        update: &ListingUpdate,
        token: &AccessToken,
    ) -> Result<(), MarketplaceError> {
        let url = self.client.config().item_url(listing_id.as_str());
        let body = ItemUpdateRequest::from(update);
        tracing::debug!(price = ?body.price, status = ?body.status, "Updating listing");
        self.client.put(&url, &body, token).await
    }
}
