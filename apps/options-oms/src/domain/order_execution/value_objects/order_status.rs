//! Order status in the lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Multi-leg order status.
///
/// Serialized by name so snapshots written before a new variant is added
/// still parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order created, not yet validated or submitted.
    Pending,
    /// Order accepted by the gateway, awaiting execution.
    Submitted,
    /// Some contracts executed. Declared for compatibility with stored
    /// snapshots; no execution path produces it yet.
    PartiallyFilled,
    /// Order completely filled.
    Filled,
    /// Order cancelled.
    Cancelled,
    /// Order rejected by validation or by the venue.
    Rejected,
    /// Order expired without execution.
    Expired,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Filled | Self::Cancelled | Self::Rejected | Self::Expired
        )
    }

    /// Returns true if the order belongs in the active set.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the order can be cancelled.
    #[must_use]
    pub const fn is_cancelable(&self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Submitted | Self::PartiallyFilled
        )
    }

    /// Returns true if the order can receive fills.
    #[must_use]
    pub const fn can_fill(&self) -> bool {
        matches!(self, Self::Submitted | Self::PartiallyFilled)
    }

    /// Stable upper-case name, identical to the serialized form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Submitted => "SUBMITTED",
            Self::PartiallyFilled => "PARTIALLY_FILLED",
            Self::Filled => "FILLED",
            Self::Cancelled => "CANCELLED",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
