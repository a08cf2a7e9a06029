//! Application Ports (Driven)
//!
//! Ports define interfaces for interacting with external systems: the source
//! marketplace, the destination marketplace, credentials, persistence, and
//! notification.

mod credential_port;
mod listing_repository_port;
mod marketplace_port;
mod notification_port;
mod source_probe_port;

#[cfg(test)]
pub use credential_port::MockCredentialProvider;
pub use credential_port::{AccessToken, CredentialError, CredentialProvider};
pub use listing_repository_port::{ListingRepository, RepositoryError};
pub use marketplace_port::{
    DestinationMarketplacePort, ListingUpdate, MarketplaceError, RemoteListing,
    RemoteListingStatus,
};
#[cfg(test)]
pub use notification_port::MockNotificationPort;
pub use notification_port::{NoOpNotifier, NotificationPort, NotifyError};
pub use source_probe_port::{IdentityRotator, LocaleHint, ProbeError, SourceProbePort};
