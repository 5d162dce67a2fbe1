//! Prometheus metrics for the order management system.
//!
//! The `record_*` helpers are no-ops until a recorder is installed, so the
//! library can be used without the exporter.
//!
//! # Example
//!
//! ```ignore
//! use options_oms::observability::{init_metrics, MetricsConfig};
//!
//! let config = MetricsConfig::with_addr("0.0.0.0:9090".parse()?);
//! init_metrics(&config)?;
//! ```

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use crate::domain::order_execution::{OrderStatus, StrategyType};

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for fill latency (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl MetricsConfig {
    /// Create a metrics configuration for `addr`.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            // Fill latency from 10ms to 10 minutes
            latency_buckets: vec![
                0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 300.0, 600.0,
            ],
        }
    }
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

// ============================================================================
// Order Lifecycle Metrics
// ============================================================================

/// Record a newly created order.
pub fn record_order_created(strategy: StrategyType) {
    counter!("oms_orders_created_total", "strategy" => strategy.to_string()).increment(1);
}

/// Record a status transition.
pub fn record_order_transition(status: OrderStatus) {
    counter!("oms_order_transitions_total", "status" => status.as_str()).increment(1);
}

/// Record time from submission to fill.
pub fn record_fill_latency(gateway: &'static str, latency_seconds: f64) {
    histogram!("oms_fill_latency_seconds", "gateway" => gateway).record(latency_seconds);
}

/// Record a failed state save.
pub fn record_persistence_failure() {
    counter!("oms_persistence_failures_total").increment(1);
}

/// Update the active orders gauge.
pub fn update_active_orders(count: usize) {
    gauge!("oms_active_orders").set(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_with_addr() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let config = MetricsConfig::with_addr(addr);
        assert_eq!(config.listen_addr.port(), 8080);
        assert!(config.latency_buckets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_order_created(StrategyType::BullCallSpread);
        record_order_transition(OrderStatus::Filled);
        record_fill_latency("paper", 0.05);
        record_persistence_failure();
        update_active_orders(3);
    }
}
