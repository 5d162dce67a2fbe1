//! Options OMS Binary
//!
//! Starts the order management system in paper mode, places a sample bull
//! call spread, waits for it to fill, logs the summary and shuts down.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin options-oms
//! ```
//!
//! # Environment Variables
//!
//! - `OMS_CONFIG`: Path to the YAML config file (default: config.yaml; a
//!   missing file falls back to defaults)
//! - `RUST_LOG`: Log filter (default: `observability.logging.level`)

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use options_oms::config::Config;
use options_oms::observability::{MetricsConfig, init_metrics};
use options_oms::telemetry::init_tracing;
use options_oms::{Container, OrderManagementSystem, load_config_or_default};
use rust_decimal_macros::dec;
use tokio::signal;
use tracing::{info, warn};

/// Environment variable holding the config file path.
const CONFIG_ENV: &str = "OMS_CONFIG";

/// Extra time allowed past the fill delay before reading the summary.
const FILL_GRACE: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var(CONFIG_ENV).ok();
    let config = load_config_or_default(config_path.as_deref())
        .context("Failed to load configuration")?;

    init_tracing(&config.observability.logging).context("Failed to initialize tracing")?;
    start_metrics(&config)?;
    log_config(&config);

    let fill_delay = config.execution.fill_delay();
    let container = Container::paper(config).context("Failed to wire the OMS")?;
    let oms = container
        .start_oms()
        .await
        .context("Failed to start the OMS")?;

    tokio::select! {
        result = run_sample_spread(&oms, fill_delay) => result?,
        () = shutdown_signal() => {}
    }

    oms.shutdown().await.context("Failed to shut down the OMS")?;
    info!("Options OMS stopped");
    Ok(())
}

/// Install the Prometheus exporter when a listen address is configured.
fn start_metrics(config: &Config) -> anyhow::Result<()> {
    let Some(addr) = config.observability.metrics.listen_addr.as_deref() else {
        return Ok(());
    };
    let addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("Invalid metrics listen address '{addr}'"))?;
    init_metrics(&MetricsConfig::with_addr(addr)).context("Failed to start metrics exporter")?;
    Ok(())
}

/// Log the loaded configuration.
fn log_config(config: &Config) {
    info!(
        paper_trading = config.execution.paper_trading,
        fill_delay_ms = config.execution.fill_delay_ms,
        rejection_rate = config.execution.rejection_rate,
        max_workers = config.execution.max_workers,
        max_order_value = %config.limits.max_order_value,
        max_spread_width = %config.limits.max_spread_width,
        market_hours_only = config.limits.market_hours_only,
        persistence = config.persistence.enabled,
        "Configuration loaded"
    );
}

/// Place and submit the sample SPY 400/420 bull call spread, then report.
async fn run_sample_spread(
    oms: &OrderManagementSystem,
    fill_delay: Duration,
) -> anyhow::Result<()> {
    let order_id = oms
        .create_spread_order("SPY", dec!(400), dec!(420), "2024-02-16", dec!(2.50), 1)
        .await
        .context("Failed to create sample spread")?;

    match oms.submit_order(&order_id).await {
        Ok(()) => info!(order_id = %order_id, "Sample spread submitted"),
        Err(e) => warn!(order_id = %order_id, code = %e.code(), error = %e, "Sample spread not submitted"),
    }

    tokio::time::sleep(fill_delay + FILL_GRACE).await;

    let status = oms.order_status(&order_id).await?;
    let summary = oms.order_summary().await?;
    info!(
        order_id = %order_id,
        status = %status,
        total_orders = summary.total_orders,
        active_orders = summary.active_orders,
        filled = summary.filled,
        rejected = summary.rejected,
        cancelled = summary.cancelled,
        fill_rate = summary.fill_rate,
        total_commission = %summary.total_commission,
        persistence_failures = summary.persistence_failures,
        "Order summary"
    );
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, initiating shutdown"),
        () = terminate => info!("Received SIGTERM, initiating shutdown"),
    }
}
