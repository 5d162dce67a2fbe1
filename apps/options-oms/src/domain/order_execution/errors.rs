//! Order execution errors.

use std::fmt;

use super::value_objects::OrderStatus;
use crate::domain::contract::ContractError;

/// Errors that can occur in order execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Invalid state transition attempted.
    InvalidStateTransition {
        /// Current order status.
        from: OrderStatus,
        /// Attempted status.
        to: OrderStatus,
        /// Reason for failure.
        reason: String,
    },

    /// Order cannot be canceled in current state.
    CannotCancel {
        /// Current status.
        status: OrderStatus,
    },

    /// Invalid order parameters.
    InvalidParameters {
        /// Field with invalid value.
        field: String,
        /// Error message.
        message: String,
    },

    /// Order not found.
    NotFound {
        /// Order ID.
        order_id: String,
    },

    /// Duplicate order ID.
    DuplicateOrderId {
        /// Order ID.
        order_id: String,
    },
}

impl OrderError {
    /// Build an `InvalidParameters` error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStateTransition { from, to, reason } => {
                write!(
                    f,
                    "Invalid order state transition: {from} -> {to}: {reason}"
                )
            }
            Self::CannotCancel { status } => {
                write!(f, "Cannot cancel order in status: {status}")
            }
            Self::InvalidParameters { field, message } => {
                write!(f, "Invalid order parameter '{field}': {message}")
            }
            Self::NotFound { order_id } => {
                write!(f, "Order not found: {order_id}")
            }
            Self::DuplicateOrderId { order_id } => {
                write!(f, "Duplicate order ID: {order_id}")
            }
        }
    }
}

impl std::error::Error for OrderError {}

impl From<ContractError> for OrderError {
    fn from(err: ContractError) -> Self {
        let field = match err {
            ContractError::NonPositiveStrike { .. } => "strike",
            ContractError::InvalidExpiration { .. } => "expiration",
            ContractError::EmptyUnderlying => "underlying",
            ContractError::ZeroMultiplier => "multiplier",
        };
        Self::invalid(field, err.to_string())
    }
}
