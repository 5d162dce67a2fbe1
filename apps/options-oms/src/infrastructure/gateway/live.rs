//! Live gateway backed by an external [`Broker`].
//!
//! Fills and venue rejections arrive through
//! `OrderManagementSystem::report_execution`, not through this type.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::application::ports::{
    Broker, BrokerGateway, GatewayAck, GatewayError, ReportSender, SubmitOrderRequest,
};
use crate::domain::order_execution::MultiLegOrder;

/// Gateway that forwards orders to a live broker.
pub struct LiveGateway<B: Broker> {
    broker: Arc<B>,
}

impl<B: Broker> LiveGateway<B> {
    /// Wrap a broker.
    pub const fn new(broker: Arc<B>) -> Self {
        Self { broker }
    }
}

#[async_trait]
impl<B: Broker + 'static> BrokerGateway for LiveGateway<B> {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn submit(
        &self,
        order: &MultiLegOrder,
        _reports: &ReportSender,
    ) -> Result<GatewayAck, GatewayError> {
        let request = SubmitOrderRequest::from_order(order);
        let broker_order_id = self.broker.submit_order(request).await?;
        info!(
            order_id = %order.order_id(),
            broker_order_id = %broker_order_id,
            "Live order accepted"
        );
        Ok(GatewayAck {
            broker_order_id: Some(broker_order_id),
        })
    }

    async fn cancel(&self, order: &MultiLegOrder) -> Result<(), GatewayError> {
        // Orders that never reached the broker have nothing to cancel there.
        let Some(broker_order_id) = order.broker_order_id() else {
            return Ok(());
        };
        self.broker.cancel_order(broker_order_id).await?;
        Ok(())
    }

    async fn shutdown(&self) {}
}
