//! Paper trading gateway.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::info;

use super::fill_simulator::FillSimulator;
use super::retry::SchedulingRetryPolicy;
use crate::application::ports::{BrokerGateway, GatewayAck, GatewayError, ReportSender};
use crate::domain::order_execution::MultiLegOrder;
use crate::domain::shared::BrokerOrderId;

/// Paper gateway configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperGatewayConfig {
    /// Delay before a submitted order fills.
    pub fill_delay: Duration,
    /// Probability in `[0, 1]` of rejecting a submission.
    pub rejection_rate: f64,
    /// Maximum concurrent fill tasks.
    pub max_workers: usize,
    /// Backoff while the worker pool is full.
    pub retry: SchedulingRetryPolicy,
}

impl Default for PaperGatewayConfig {
    fn default() -> Self {
        Self {
            fill_delay: Duration::from_secs(5),
            rejection_rate: 0.02,
            max_workers: 4,
            retry: SchedulingRetryPolicy::default(),
        }
    }
}

/// Simulated venue: random rejection at submit, delayed fill at `|net|`.
#[derive(Debug)]
pub struct PaperGateway {
    rejection_rate: f64,
    simulator: FillSimulator,
    sequence: AtomicU64,
}

impl PaperGateway {
    /// Create a paper gateway.
    #[must_use]
    pub fn new(config: PaperGatewayConfig) -> Self {
        Self {
            rejection_rate: config.rejection_rate,
            simulator: FillSimulator::new(config.max_workers, config.fill_delay, config.retry),
            sequence: AtomicU64::new(0),
        }
    }

    /// Number of fills still pending.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.simulator.in_flight()
    }

    fn roll_rejection(&self) -> bool {
        let roll: f64 = rand::rng().random();
        roll < self.rejection_rate
    }
}

#[async_trait]
impl BrokerGateway for PaperGateway {
    fn name(&self) -> &'static str {
        "paper"
    }

    async fn submit(
        &self,
        order: &MultiLegOrder,
        reports: &ReportSender,
    ) -> Result<GatewayAck, GatewayError> {
        if self.roll_rejection() {
            return Err(GatewayError::Rejected {
                reason: "Simulated venue rejection".to_string(),
            });
        }

        self.simulator.schedule(
            order.order_id().clone(),
            order.net_debit_credit().abs(),
            reports.clone(),
        )?;

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let broker_order_id = BrokerOrderId::new(format!("PAPER-{sequence:06}"));
        info!(
            order_id = %order.order_id(),
            broker_order_id = %broker_order_id,
            "Paper order accepted"
        );

        Ok(GatewayAck {
            broker_order_id: Some(broker_order_id),
        })
    }

    async fn cancel(&self, _order: &MultiLegOrder) -> Result<(), GatewayError> {
        // A pending fill for a cancelled order is discarded by the OMS.
        Ok(())
    }

    async fn shutdown(&self) {
        self.simulator.shutdown().await;
    }
}
