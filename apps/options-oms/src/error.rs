//! Facade-level errors for the order management system.
//!
//! Every public OMS operation returns [`OmsError`]. Each variant maps to a
//! stable [`ErrorCode`] so callers can branch without matching on messages.
//!
//! | Code | Raised when |
//! |------|-------------|
//! | `INVALID_ORDER_PARAMS` | Contract or order construction failed |
//! | `NOTIONAL_LIMIT_EXCEEDED` | Pre-trade notional check failed |
//! | `SPREAD_WIDTH_EXCEEDED` | Pre-trade spread width check failed |
//! | `MARKET_CLOSED` | Submitted on a weekend |
//! | `ORDER_NOT_FOUND` | Unknown order id |
//! | `INVALID_ORDER_STATE` | Operation not allowed in the current status |
//! | `ORDER_REJECTED` | Venue refused the order |
//! | `BROKER_API_ERROR` | Venue call failed |
//! | `PERSISTENCE_ERROR` | State snapshot could not be loaded |
//! | `INVALID_CONFIGURATION` | Configuration rejected at startup |
//! | `SHUT_DOWN` | Called after `shutdown` |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::{GatewayError, StoreError};
use crate::config::ConfigError;
use crate::domain::order_execution::{OrderError, OrderStatus};
use crate::domain::risk_management::ValidationError;

/// Error codes for the OMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invalid order parameters (strike, expiration, quantity, ...).
    InvalidOrderParams,
    /// Notional limit exceeded.
    NotionalLimitExceeded,
    /// Spread width limit exceeded.
    SpreadWidthExceeded,
    /// Market is closed.
    MarketClosed,
    /// Order not found.
    OrderNotFound,
    /// Operation not allowed in the order's status.
    InvalidOrderState,
    /// Order rejected by the venue.
    OrderRejected,
    /// Venue call failed.
    BrokerApiError,
    /// State store failure.
    PersistenceError,
    /// Configuration rejected.
    InvalidConfiguration,
    /// OMS already shut down.
    ShutDown,
}

impl ErrorCode {
    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidOrderParams => "INVALID_ORDER_PARAMS",
            Self::NotionalLimitExceeded => "NOTIONAL_LIMIT_EXCEEDED",
            Self::SpreadWidthExceeded => "SPREAD_WIDTH_EXCEEDED",
            Self::MarketClosed => "MARKET_CLOSED",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::InvalidOrderState => "INVALID_ORDER_STATE",
            Self::OrderRejected => "ORDER_REJECTED",
            Self::BrokerApiError => "BROKER_API_ERROR",
            Self::PersistenceError => "PERSISTENCE_ERROR",
            Self::InvalidConfiguration => "INVALID_CONFIGURATION",
            Self::ShutDown => "SHUT_DOWN",
        }
    }

    /// Returns true for caller mistakes that should not be logged as incidents.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidOrderParams
                | Self::NotionalLimitExceeded
                | Self::SpreadWidthExceeded
                | Self::MarketClosed
                | Self::OrderNotFound
                | Self::InvalidOrderState
        )
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Errors returned by the OMS facade.
#[derive(Debug, Error)]
pub enum OmsError {
    /// Order could not be constructed.
    #[error("Invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    /// Pre-trade validation failed; the order is now REJECTED.
    #[error("Validation failed for {order_id}: {source}")]
    Validation {
        /// Order that failed.
        order_id: String,
        /// Failed check.
        source: ValidationError,
    },

    /// Unknown order id.
    #[error("Order not found: {order_id}")]
    NotFound {
        /// Requested id.
        order_id: String,
    },

    /// Operation not allowed in the order's current status.
    #[error("Cannot {action} order {order_id} in status {status}")]
    InvalidState {
        /// Order id.
        order_id: String,
        /// Current status.
        status: OrderStatus,
        /// Attempted operation.
        action: &'static str,
    },

    /// Venue refused the order; the order is now REJECTED.
    #[error("Order {order_id} rejected: {reason}")]
    Rejected {
        /// Order id.
        order_id: String,
        /// Venue reason.
        reason: String,
    },

    /// Venue call failed.
    #[error("Gateway error for {order_id}: {source}")]
    Gateway {
        /// Order id.
        order_id: String,
        /// Underlying error.
        source: GatewayError,
    },

    /// State snapshot could not be loaded.
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// Configuration rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The OMS has been shut down.
    #[error("Order management system is shut down")]
    ShutDown,
}

impl OmsError {
    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidOrder(_) => ErrorCode::InvalidOrderParams,
            Self::Validation { source, .. } => match source {
                ValidationError::OrderValueExceeded { .. } => ErrorCode::NotionalLimitExceeded,
                ValidationError::SpreadTooWide { .. } => ErrorCode::SpreadWidthExceeded,
                ValidationError::MarketClosed { .. } => ErrorCode::MarketClosed,
            },
            Self::NotFound { .. } => ErrorCode::OrderNotFound,
            Self::InvalidState { .. } => ErrorCode::InvalidOrderState,
            Self::Rejected { .. } => ErrorCode::OrderRejected,
            Self::Gateway { .. } => ErrorCode::BrokerApiError,
            Self::Persistence(_) => ErrorCode::PersistenceError,
            Self::Config(_) => ErrorCode::InvalidConfiguration,
            Self::ShutDown => ErrorCode::ShutDown,
        }
    }
}
