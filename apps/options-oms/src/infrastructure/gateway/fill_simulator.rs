//! Paper fill simulator.
//!
//! Runs one task per submitted paper order on a bounded pool. A task holds
//! a worker permit for the whole fill delay, then reports the fill. Tasks
//! never touch orders; the repository owner decides whether a report still
//! applies.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use super::retry::SchedulingRetryPolicy;
use crate::application::ports::{ExecutionReport, GatewayError, ReportSender};
use crate::domain::shared::OrderId;

/// Bounded pool of delayed fill tasks.
#[derive(Debug)]
pub struct FillSimulator {
    permits: Arc<Semaphore>,
    fill_delay: Duration,
    retry: SchedulingRetryPolicy,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl FillSimulator {
    /// Create a simulator with `max_workers` concurrent fills.
    #[must_use]
    pub fn new(max_workers: usize, fill_delay: Duration, retry: SchedulingRetryPolicy) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_workers)),
            fill_delay,
            retry,
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Schedule a fill for `order_id` at `fill_price`.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` once the simulator has been shut down.
    pub fn schedule(
        &self,
        order_id: OrderId,
        fill_price: Decimal,
        reports: ReportSender,
    ) -> Result<(), GatewayError> {
        if self.tracker.is_closed() {
            return Err(GatewayError::Unavailable {
                message: "fill simulator is shut down".to_string(),
            });
        }

        let task = FillTask {
            order_id,
            fill_price,
            reports,
            permits: Arc::clone(&self.permits),
            fill_delay: self.fill_delay,
            retry: self.retry.clone(),
            shutdown: self.shutdown.clone(),
        };
        self.tracker.spawn(task.run());
        Ok(())
    }

    /// Number of fill tasks not yet finished.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Abort pending fills and wait for every task to exit.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

struct FillTask {
    order_id: OrderId,
    fill_price: Decimal,
    reports: ReportSender,
    permits: Arc<Semaphore>,
    fill_delay: Duration,
    retry: SchedulingRetryPolicy,
    shutdown: CancellationToken,
}

impl FillTask {
    async fn run(self) {
        let Some(_permit) = self.acquire_permit().await else {
            return;
        };

        tokio::select! {
            () = tokio::time::sleep(self.fill_delay) => {}
            () = self.shutdown.cancelled() => {
                debug!(order_id = %self.order_id, "Fill aborted by shutdown");
                return;
            }
        }

        let report = ExecutionReport::Filled {
            order_id: self.order_id,
            fill_price: self.fill_price,
            filled_at: Utc::now(),
        };
        // The receiver is gone only after the OMS stopped.
        if self.reports.send(report).is_err() {
            debug!("Execution report dropped, OMS stopped");
        }
    }

    async fn acquire_permit(&self) -> Option<OwnedSemaphorePermit> {
        let mut attempt = 0;
        loop {
            match Arc::clone(&self.permits).try_acquire_owned() {
                Ok(permit) => return Some(permit),
                Err(TryAcquireError::Closed) => return None,
                Err(TryAcquireError::NoPermits) => {}
            }

            let Some(delay) = self.retry.delay_for(attempt) else {
                warn!(
                    order_id = %self.order_id,
                    attempts = attempt,
                    "Fill scheduling exhausted retries"
                );
                let report = ExecutionReport::Rejected {
                    order_id: self.order_id.clone(),
                    reason: format!(
                        "Fill scheduling failed after {attempt} retries: worker pool exhausted"
                    ),
                };
                if self.reports.send(report).is_err() {
                    debug!("Execution report dropped, OMS stopped");
                }
                return None;
            };

            attempt += 1;
            debug!(
                order_id = %self.order_id,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Worker pool full, retrying fill scheduling"
            );
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = self.shutdown.cancelled() => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn reports_fill_after_delay() {
        let simulator =
            FillSimulator::new(2, Duration::from_millis(20), SchedulingRetryPolicy::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        simulator
            .schedule(OrderId::new("BCS_1"), dec!(2.50), tx)
            .unwrap();

        let report = rx.recv().await.unwrap();
        let ExecutionReport::Filled {
            order_id,
            fill_price,
            ..
        } = report
        else {
            panic!("expected fill, got {report:?}");
        };
        assert_eq!(order_id.as_str(), "BCS_1");
        assert_eq!(fill_price, dec!(2.50));
    }

    #[tokio::test]
    async fn exhausted_pool_reports_rejection() {
        let simulator =
            FillSimulator::new(1, Duration::from_millis(200), SchedulingRetryPolicy::no_retry());
        let (tx, mut rx) = mpsc::unbounded_channel();

        simulator
            .schedule(OrderId::new("BCS_1"), dec!(2.50), tx.clone())
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        simulator
            .schedule(OrderId::new("BCS_2"), dec!(2.50), tx)
            .unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(
            first,
            ExecutionReport::Rejected {
                order_id: OrderId::new("BCS_2"),
                reason: "Fill scheduling failed after 0 retries: worker pool exhausted"
                    .to_string(),
            }
        );
        let second = rx.recv().await.unwrap();
        assert!(matches!(second, ExecutionReport::Filled { .. }));
    }

    #[tokio::test]
    async fn waits_for_free_worker() {
        let retry = SchedulingRetryPolicy::new(
            20,
            Duration::from_millis(10),
            Duration::from_millis(20),
            2.0,
            0.0,
        );
        let simulator = FillSimulator::new(1, Duration::from_millis(30), retry);
        let (tx, mut rx) = mpsc::unbounded_channel();

        for id in ["BCS_1", "BCS_2"] {
            simulator
                .schedule(OrderId::new(id), dec!(1), tx.clone())
                .unwrap();
        }

        for _ in 0..2 {
            let report = rx.recv().await.unwrap();
            assert!(matches!(report, ExecutionReport::Filled { .. }));
        }
    }

    #[tokio::test]
    async fn shutdown_aborts_pending_fills() {
        let simulator =
            FillSimulator::new(1, Duration::from_secs(60), SchedulingRetryPolicy::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        simulator
            .schedule(OrderId::new("BCS_1"), dec!(2.50), tx)
            .unwrap();

        tokio::time::timeout(Duration::from_secs(1), simulator.shutdown())
            .await
            .unwrap();
        assert_eq!(simulator.in_flight(), 0);
        assert!(rx.recv().await.is_none());

        let (tx, _rx) = mpsc::unbounded_channel();
        let err = simulator
            .schedule(OrderId::new("BCS_2"), dec!(2.50), tx)
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable { .. }));
    }
}
