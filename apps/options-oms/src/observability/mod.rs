//! Observability module for metrics.
//!
//! Prometheus counters, gauges and histograms for the order lifecycle.

mod metrics;

pub use self::metrics::{
    MetricsConfig, MetricsError, init_metrics, record_fill_latency, record_order_created,
    record_order_transition, record_persistence_failure, update_active_orders,
};
