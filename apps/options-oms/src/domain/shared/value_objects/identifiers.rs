//! Strongly-typed identifiers for domain entities.
//!
//! These prevent mixing up IDs from different contexts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

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

define_id!(OrderId, "Unique identifier for a multi-leg order (OMS internal).");
define_id!(BrokerOrderId, "Venue-assigned identifier for a submitted order.");

impl OrderId {
    /// Generate a new identifier: `{prefix}_{YYYYmmdd_HHMMSS}_{uuid}`.
    ///
    /// The timestamp keeps ids sortable by creation second; the UUID v4
    /// suffix keeps them unique within a second and across restarts.
    #[must_use]
    pub fn generate(prefix: &str, at: DateTime<Utc>) -> Self {
        Self(format!(
            "{prefix}_{}_{}",
            at.format("%Y%m%d_%H%M%S"),
            uuid::Uuid::new_v4().simple()
        ))
    }
}
