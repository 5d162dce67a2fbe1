//! Order Manager
//!
//! The single task that owns the [`OrderRepository`]. Facade commands and
//! execution reports arrive as messages and are applied one at a time, so
//! at most one terminal transition ever runs per order and a cancel racing
//! a fill is decided by message order. Every mutation is followed by a
//! snapshot write; a failed write is logged and counted but never rolls the
//! transition back.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::settings::{OmsSettings, StaleOrderPolicy};
use crate::application::dto::OrderSummary;
use crate::application::ports::{
    BrokerGateway, ExecutionReport, GatewayError, ReportSender, StateStore,
};
use crate::domain::order_execution::{MultiLegOrder, OrderError, OrderRepository, OrderStatus};
use crate::domain::risk_management::OrderValidator;
use crate::domain::shared::OrderId;
use crate::error::OmsError;
use crate::observability::{
    record_fill_latency, record_order_created, record_order_transition,
    record_persistence_failure, update_active_orders,
};

pub(super) type Reply<T> = oneshot::Sender<Result<T, OmsError>>;

/// Requests handled by the order manager.
pub(super) enum Command {
    Create {
        order: MultiLegOrder,
        reply: Reply<OrderId>,
    },
    Submit {
        order_id: OrderId,
        reply: Reply<()>,
    },
    Cancel {
        order_id: OrderId,
        reply: Reply<()>,
    },
    Get {
        order_id: OrderId,
        reply: Reply<MultiLegOrder>,
    },
    List {
        reply: Reply<Vec<MultiLegOrder>>,
    },
    Summary {
        reply: Reply<OrderSummary>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

const USER_CANCEL_NOTE: &str = "Cancelled by user";
const SHUTDOWN_CANCEL_NOTE: &str = "Cancelled on shutdown";
const STALE_NOTE: &str = "No execution report within grace period";

pub(super) struct OrderManager {
    repo: OrderRepository,
    validator: OrderValidator,
    settings: OmsSettings,
    gateway: Arc<dyn BrokerGateway>,
    store: Arc<dyn StateStore>,
    reports: ReportSender,
    persistence_failures: u64,
    stale_alerted: HashSet<OrderId>,
}

impl OrderManager {
    pub(super) fn new(
        repo: OrderRepository,
        settings: OmsSettings,
        gateway: Arc<dyn BrokerGateway>,
        store: Arc<dyn StateStore>,
        reports: ReportSender,
    ) -> Self {
        Self {
            repo,
            validator: OrderValidator::new(settings.validation.clone()),
            settings,
            gateway,
            store,
            reports,
            persistence_failures: 0,
            stale_alerted: HashSet::new(),
        }
    }

    /// Process commands, reports and stale sweeps until shut down.
    pub(super) async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut reports: mpsc::UnboundedReceiver<ExecutionReport>,
    ) {
        let mut sweep = tokio::time::interval(self.settings.sweep_interval);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
        sweep.reset();

        loop {
            tokio::select! {
                biased;

                Some(report) = reports.recv() => self.apply_report(report).await,

                command = commands.recv() => match command {
                    Some(Command::Shutdown { reply }) => {
                        self.shutdown(&mut reports).await;
                        let _ = reply.send(());
                        break;
                    }
                    Some(command) => self.handle(command).await,
                    None => {
                        self.shutdown(&mut reports).await;
                        break;
                    }
                },

                _ = sweep.tick() => self.sweep_stale(Utc::now()).await,
            }
        }
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Create { order, reply } => {
                let _ = reply.send(self.create(order).await);
            }
            Command::Submit { order_id, reply } => {
                let _ = reply.send(self.submit(&order_id).await);
            }
            Command::Cancel { order_id, reply } => {
                let _ = reply.send(self.cancel(&order_id).await);
            }
            Command::Get { order_id, reply } => {
                let _ = reply.send(self.find(&order_id).cloned());
            }
            Command::List { reply } => {
                let _ = reply.send(Ok(self.repo.orders().to_vec()));
            }
            Command::Summary { reply } => {
                let _ = reply.send(Ok(self.summary()));
            }
            // Intercepted by `run`.
            Command::Shutdown { reply } => {
                let _ = reply.send(());
            }
        }
    }

    fn find(&self, order_id: &OrderId) -> Result<&MultiLegOrder, OmsError> {
        self.repo.get(order_id).ok_or_else(|| OmsError::NotFound {
            order_id: order_id.to_string(),
        })
    }

    fn summary(&self) -> OrderSummary {
        OrderSummary::from_repository(&self.repo, self.persistence_failures, Utc::now())
    }

    // ========================================================================
    // Commands
    // ========================================================================

    async fn create(&mut self, order: MultiLegOrder) -> Result<OrderId, OmsError> {
        let order_id = order.order_id().clone();
        let strategy = order.strategy_type();
        info!(
            order_id = %order_id,
            strategy = %strategy,
            net_debit_credit = %order.net_debit_credit(),
            quantity = order.quantity(),
            commission = %order.commission(),
            "Order created"
        );

        self.repo.insert(order)?;
        record_order_created(strategy);
        update_active_orders(self.repo.active_count());
        self.persist().await;
        Ok(order_id)
    }

    async fn submit(&mut self, order_id: &OrderId) -> Result<(), OmsError> {
        let order = self.find(order_id)?.clone();
        if order.status() != OrderStatus::Pending {
            return Err(OmsError::InvalidState {
                order_id: order_id.to_string(),
                status: order.status(),
                action: "submit",
            });
        }

        let now = Utc::now();
        if let Err(source) = self.validator.validate(&order, now) {
            info!(order_id = %order_id, code = source.code(), "Order failed validation");
            let reason = source.to_string();
            self.apply(order_id, |o| o.reject(reason)).await?;
            return Err(OmsError::Validation {
                order_id: order_id.to_string(),
                source,
            });
        }

        match self.gateway.submit(&order, &self.reports).await {
            Ok(ack) => {
                self.apply(order_id, |o| o.mark_submitted(ack.broker_order_id, now))
                    .await?;
                Ok(())
            }
            Err(source) if source.is_rejection() => {
                let reason = match source {
                    GatewayError::Rejected { reason } => reason,
                    other => other.to_string(),
                };
                let note = reason.clone();
                self.apply(order_id, |o| o.reject(note)).await?;
                Err(OmsError::Rejected {
                    order_id: order_id.to_string(),
                    reason,
                })
            }
            Err(source) => {
                warn!(
                    order_id = %order_id,
                    gateway = self.gateway.name(),
                    error = %source,
                    "Gateway submission failed"
                );
                let note = source.to_string();
                self.apply(order_id, |o| o.reject(note)).await?;
                Err(OmsError::Gateway {
                    order_id: order_id.to_string(),
                    source,
                })
            }
        }
    }

    async fn cancel(&mut self, order_id: &OrderId) -> Result<(), OmsError> {
        let order = self.find(order_id)?.clone();
        if order.status().is_terminal() {
            return Err(OmsError::InvalidState {
                order_id: order_id.to_string(),
                status: order.status(),
                action: "cancel",
            });
        }

        if order.status() == OrderStatus::Submitted {
            self.gateway
                .cancel(&order)
                .await
                .map_err(|source| OmsError::Gateway {
                    order_id: order_id.to_string(),
                    source,
                })?;
        }

        self.apply(order_id, |o| o.cancel(USER_CANCEL_NOTE)).await?;
        Ok(())
    }

    // ========================================================================
    // Execution Reports
    // ========================================================================

    async fn apply_report(&mut self, report: ExecutionReport) {
        let Some(order) = self.repo.get(report.order_id()) else {
            warn!(order_id = %report.order_id(), "Execution report for unknown order");
            return;
        };
        if order.status() != OrderStatus::Submitted {
            debug!(
                order_id = %order.order_id(),
                status = %order.status(),
                "Ignoring execution report for order no longer submitted"
            );
            return;
        }
        let submitted_at = order.submitted_at();
        let order_id = order.order_id().clone();

        let outcome = match report {
            ExecutionReport::Filled {
                fill_price,
                filled_at,
                ..
            } => {
                let outcome = self.apply(&order_id, |o| o.fill(fill_price, filled_at)).await;
                if outcome.is_ok()
                    && let Some(latency) =
                        submitted_at.and_then(|at| (filled_at - at).to_std().ok())
                {
                    record_fill_latency(self.gateway.name(), latency.as_secs_f64());
                }
                outcome
            }
            ExecutionReport::Rejected { reason, .. } => {
                warn!(order_id = %order_id, reason = %reason, "Order rejected by venue");
                self.apply(&order_id, |o| o.reject(reason)).await
            }
        };

        if let Err(e) = outcome {
            warn!(order_id = %order_id, error = %e, "Failed to apply execution report");
        }
    }

    // ========================================================================
    // Stale Orders
    // ========================================================================

    async fn sweep_stale(&mut self, now: DateTime<Utc>) {
        let Ok(grace) = TimeDelta::from_std(self.settings.submitted_grace_period) else {
            return;
        };

        let stale: Vec<MultiLegOrder> = self
            .repo
            .active()
            .filter(|o| o.status() == OrderStatus::Submitted)
            .filter(|o| {
                o.submitted_at()
                    .and_then(|at| at.checked_add_signed(grace))
                    .is_some_and(|deadline| deadline < now)
            })
            .cloned()
            .collect();

        for order in stale {
            let order_id = order.order_id().clone();
            match self.settings.stale_order_policy {
                StaleOrderPolicy::Manual => {
                    if self.stale_alerted.insert(order_id.clone()) {
                        error!(
                            order_id = %order_id,
                            submitted_at = ?order.submitted_at(),
                            "Order stuck in SUBMITTED past grace period; manual intervention required"
                        );
                    }
                }
                StaleOrderPolicy::Expire => {
                    warn!(order_id = %order_id, "Expiring stale submitted order");
                    if let Err(e) = self.apply(&order_id, |o| o.expire(STALE_NOTE)).await {
                        warn!(order_id = %order_id, error = %e, "Failed to expire stale order");
                    }
                }
                StaleOrderPolicy::Cancel => {
                    warn!(order_id = %order_id, "Cancelling stale submitted order");
                    if let Err(e) = self.gateway.cancel(&order).await {
                        warn!(order_id = %order_id, error = %e, "Gateway cancel failed for stale order");
                        continue;
                    }
                    if let Err(e) = self.apply(&order_id, |o| o.cancel(STALE_NOTE)).await {
                        warn!(order_id = %order_id, error = %e, "Failed to cancel stale order");
                    }
                }
            }
        }
    }

    // ========================================================================
    // Shutdown
    // ========================================================================

    async fn shutdown(&mut self, reports: &mut mpsc::UnboundedReceiver<ExecutionReport>) {
        info!(active = self.repo.active_count(), "Shutting down order manager");

        let active: Vec<MultiLegOrder> = self.repo.active().cloned().collect();
        for order in active {
            let order_id = order.order_id().clone();
            if order.status() == OrderStatus::Submitted
                && let Err(e) = self.gateway.cancel(&order).await
            {
                warn!(order_id = %order_id, error = %e, "Gateway cancel failed during shutdown");
            }
            if let Err(e) = self.transition(&order_id, |o| o.cancel(SHUTDOWN_CANCEL_NOTE)) {
                warn!(order_id = %order_id, error = %e, "Failed to cancel order during shutdown");
            }
        }
        self.persist().await;

        self.gateway.shutdown().await;
        while let Ok(report) = reports.try_recv() {
            self.apply_report(report).await;
        }

        let summary = self.summary();
        info!(
            total_orders = summary.total_orders,
            filled = summary.filled,
            cancelled = summary.cancelled,
            rejected = summary.rejected,
            persistence_failures = summary.persistence_failures,
            "Order manager stopped"
        );
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Apply a transition and persist the repository.
    async fn apply<F>(&mut self, order_id: &OrderId, mutate: F) -> Result<OrderStatus, OrderError>
    where
        F: FnOnce(&mut MultiLegOrder) -> Result<(), OrderError>,
    {
        let status = self.transition(order_id, mutate)?;
        self.persist().await;
        Ok(status)
    }

    fn transition<F>(&mut self, order_id: &OrderId, mutate: F) -> Result<OrderStatus, OrderError>
    where
        F: FnOnce(&mut MultiLegOrder) -> Result<(), OrderError>,
    {
        let order = self.repo.update(order_id, mutate)?;
        let status = order.status();
        info!(
            order_id = %order_id,
            status = %status,
            notes = order.notes(),
            "Order status changed"
        );

        if status.is_terminal() {
            self.stale_alerted.remove(order_id);
        }

        record_order_transition(status);
        update_active_orders(self.repo.active_count());
        Ok(status)
    }

    async fn persist(&mut self) {
        if let Err(e) = self.store.save(self.repo.orders()).await {
            self.persistence_failures += 1;
            record_persistence_failure();
            warn!(
                error = %e,
                failures = self.persistence_failures,
                "Failed to persist order state"
            );
        }
    }
}
