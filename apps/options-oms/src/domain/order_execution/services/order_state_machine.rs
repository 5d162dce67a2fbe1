//! Order State Machine Service
//!
//! Validates multi-leg order status transitions.

use crate::domain::order_execution::errors::OrderError;
use crate::domain::order_execution::value_objects::OrderStatus;

/// Order State Machine for validating transitions.
///
/// Status only moves forward. `PartiallyFilled` has no inbound edge: it is
/// declared for stored snapshots but no execution path produces it.
pub struct OrderStateMachine;

impl OrderStateMachine {
    /// Check if a state transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            // From Pending
            (OrderStatus::Pending, OrderStatus::Submitted)
                | (OrderStatus::Pending, OrderStatus::Rejected)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                // From Submitted
                | (OrderStatus::Submitted, OrderStatus::Filled)
                | (OrderStatus::Submitted, OrderStatus::Rejected)
                | (OrderStatus::Submitted, OrderStatus::Cancelled)
                | (OrderStatus::Submitted, OrderStatus::Expired)
                // From PartiallyFilled (restored snapshots only)
                | (OrderStatus::PartiallyFilled, OrderStatus::Filled)
                | (OrderStatus::PartiallyFilled, OrderStatus::Cancelled)
                | (OrderStatus::PartiallyFilled, OrderStatus::Expired)
        )
    }

    /// Validate a state transition.
    ///
    /// # Errors
    ///
    /// Returns error if the transition is invalid.
    pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(OrderError::InvalidStateTransition {
                from,
                to,
                reason: Self::transition_error_reason(from, to),
            })
        }
    }

    /// Get a human-readable reason for an invalid transition.
    #[must_use]
    pub fn transition_error_reason(from: OrderStatus, to: OrderStatus) -> String {
        match from {
            OrderStatus::Filled => format!("Order is already filled, cannot transition to {to}"),
            OrderStatus::Cancelled => format!("Order is cancelled, cannot transition to {to}"),
            OrderStatus::Rejected => format!("Order was rejected, cannot transition to {to}"),
            OrderStatus::Expired => format!("Order has expired, cannot transition to {to}"),
            _ => format!("Invalid transition from {from} to {to}"),
        }
    }

    /// Get all valid next states from a given state.
    #[must_use]
    pub fn valid_next_states(from: OrderStatus) -> Vec<OrderStatus> {
        match from {
            OrderStatus::Pending => vec![
                OrderStatus::Submitted,
                OrderStatus::Rejected,
                OrderStatus::Cancelled,
            ],
            OrderStatus::Submitted => vec![
                OrderStatus::Filled,
                OrderStatus::Rejected,
                OrderStatus::Cancelled,
                OrderStatus::Expired,
            ],
            OrderStatus::PartiallyFilled => vec![
                OrderStatus::Filled,
                OrderStatus::Cancelled,
                OrderStatus::Expired,
            ],
            // Terminal states
            OrderStatus::Filled
            | OrderStatus::Cancelled
            | OrderStatus::Rejected
            | OrderStatus::Expired => vec![],
        }
    }
}
