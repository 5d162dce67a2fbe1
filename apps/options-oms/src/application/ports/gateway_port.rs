//! Gateway Port (Driven Port)
//!
//! The seam between the OMS and whatever executes its orders: the paper
//! fill simulator or a live broker. Gateways never mutate orders. Anything
//! that happens after `submit` returns is reported back as an
//! [`ExecutionReport`] on the channel handed to `submit`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use super::BrokerError;
use crate::domain::order_execution::MultiLegOrder;
use crate::domain::shared::{BrokerOrderId, OrderId};

/// Asynchronous outcome of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionReport {
    /// Order executed in full.
    Filled {
        /// Order ID.
        order_id: OrderId,
        /// Net execution price per spread.
        fill_price: Decimal,
        /// Execution time.
        filled_at: DateTime<Utc>,
    },
    /// Order refused by the venue after acceptance.
    Rejected {
        /// Order ID.
        order_id: OrderId,
        /// Rejection reason.
        reason: String,
    },
}

impl ExecutionReport {
    /// Order the report refers to.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        match self {
            Self::Filled { order_id, .. } | Self::Rejected { order_id, .. } => order_id,
        }
    }
}

/// Sending half of the execution report channel.
pub type ReportSender = mpsc::UnboundedSender<ExecutionReport>;

/// Gateway acknowledgement of an accepted submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayAck {
    /// Venue-assigned order id, if the venue issues one.
    pub broker_order_id: Option<BrokerOrderId>,
}

/// Gateway errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Venue refused the order.
    #[error("Order rejected: {reason}")]
    Rejected {
        /// Rejection reason.
        reason: String,
    },

    /// Gateway is shutting down or otherwise unable to accept work.
    #[error("Gateway unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Broker failure.
    #[error(transparent)]
    Broker(#[from] BrokerError),
}

impl GatewayError {
    /// Returns true if the venue made a decision to refuse the order.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Rejected { .. } | Self::Broker(BrokerError::OrderRejected { .. })
        )
    }
}

/// Port for order execution venues.
#[async_trait]
pub trait BrokerGateway: Send + Sync {
    /// Venue name used in logs.
    fn name(&self) -> &'static str;

    /// Submit an order. Later outcomes are sent on `reports`.
    async fn submit(
        &self,
        order: &MultiLegOrder,
        reports: &ReportSender,
    ) -> Result<GatewayAck, GatewayError>;

    /// Cancel a submitted order at the venue.
    async fn cancel(&self, order: &MultiLegOrder) -> Result<(), GatewayError>;

    /// Stop accepting work and wait for in-flight tasks.
    async fn shutdown(&self);
}
