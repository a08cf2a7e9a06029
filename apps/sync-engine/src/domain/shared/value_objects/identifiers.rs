//! Strongly-typed identifiers for domain entities.
//!
//! These prevent mixing up source SKUs with destination listing IDs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between a parent SKU and its variant discriminator.
pub const VARIANT_SEPARATOR: char = ':';

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(
    SkuId,
    "Source-marketplace product identifier (ASIN), optionally `PARENT:VARIANT`."
);
define_id!(ListingId, "Destination-marketplace listing identifier.");
define_id!(CycleId, "Unique identifier for one synchronization cycle.");

impl SkuId {
    /// The identifier used to look the product up on the source site.
    ///
    /// Variant SKUs (`PARENT:CHILD`) resolve to the child; plain SKUs to themselves.
    #[must_use]
    pub fn lookup_key(&self) -> &str {
        match self.0.split_once(VARIANT_SEPARATOR) {
            Some((_, child)) if !child.trim().is_empty() => child.trim(),
            _ => self.0.trim(),
        }
    }

    /// The parent SKU, if this identifier carries a variant discriminator.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.0
            .split_once(VARIANT_SEPARATOR)
            .map(|(parent, _)| parent.trim())
    }
}

impl CycleId {
    /// Generate a new unique cycle identifier using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}
