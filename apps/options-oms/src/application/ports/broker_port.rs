//! Broker Port (Driven Port)
//!
//! Interface to an external brokerage for live multi-leg execution.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::order_execution::{MultiLegOrder, OrderSide, OrderType, TimeInForce};
use crate::domain::shared::{BrokerOrderId, OrderId};

/// One leg of a combo order sent to the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegRequest {
    /// Canonical instrument symbol.
    pub symbol: String,
    /// Leg side.
    pub side: OrderSide,
    /// Leg ratio.
    pub ratio: u32,
}

/// Request to submit a multi-leg order to the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOrderRequest {
    /// Client order ID.
    pub client_order_id: OrderId,
    /// Legs in execution order.
    pub legs: Vec<LegRequest>,
    /// Number of spreads.
    pub quantity: u32,
    /// Order type.
    pub order_type: OrderType,
    /// Net limit price per spread (positive debit, negative credit).
    pub limit_price: Option<Decimal>,
    /// Time in force.
    pub time_in_force: TimeInForce,
}

impl SubmitOrderRequest {
    /// Build a request from an order.
    #[must_use]
    pub fn from_order(order: &MultiLegOrder) -> Self {
        let limit_price = order
            .order_type()
            .requires_limit_price()
            .then(|| order.net_debit_credit());

        Self {
            client_order_id: order.order_id().clone(),
            legs: order
                .legs()
                .iter()
                .map(|leg| LegRequest {
                    symbol: leg.symbol().to_string(),
                    side: leg.side(),
                    ratio: leg.quantity(),
                })
                .collect(),
            quantity: order.quantity(),
            order_type: order.order_type(),
            limit_price,
            time_in_force: order.time_in_force(),
        }
    }
}

/// Broker port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// Connection error.
    #[error("Broker connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Order rejected by broker.
    #[error("Order rejected: {reason}")]
    OrderRejected {
        /// Rejection reason.
        reason: String,
    },

    /// Order not found.
    #[error("Order not found: {order_id}")]
    OrderNotFound {
        /// The missing order ID.
        order_id: String,
    },

    /// Rate limited.
    #[error("Rate limited by broker")]
    RateLimited,

    /// Unknown error.
    #[error("Broker error: {message}")]
    Unknown {
        /// Error details.
        message: String,
    },
}

/// Port for broker interactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Broker: Send + Sync {
    /// Submit a multi-leg order, returning the broker's order id.
    async fn submit_order(&self, request: SubmitOrderRequest)
    -> Result<BrokerOrderId, BrokerError>;

    /// Cancel an order by broker order id.
    async fn cancel_order(&self, broker_order_id: &BrokerOrderId) -> Result<(), BrokerError>;
}
