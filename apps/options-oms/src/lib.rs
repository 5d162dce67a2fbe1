// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Options OMS - Rust Core Library
//!
//! Order management for multi-leg options strategies: builds vertical
//! spread orders, validates them, routes them to a paper fill simulator or
//! a live broker, and persists every transition to a JSON state file.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `contract`: Option contract value object and canonical symbols
//!   - `order_execution`: Multi-leg order aggregate, state machine, repository
//!   - `risk_management`: Pre-trade validation policy
//!
//! - **Application**: Orchestration
//!   - `ports`: Interfaces for external systems (`BrokerGateway`, `Broker`, `StateStore`)
//!   - `services`: `OrderManagementSystem` facade and the task owning the repository
//!   - `dto`: Read models such as `OrderSummary`
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `gateway`: Paper fill simulator and live broker gateway
//!   - `persistence`: JSON snapshot state store
//!   - `config`: Dependency injection container
//!
//! # Example
//!
//! ```no_run
//! use options_oms::{Config, Container};
//! use rust_decimal_macros::dec;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let container = Container::paper(Config::default())?;
//! let oms = container.start_oms().await?;
//!
//! let id = oms
//!     .create_spread_order("SPY", dec!(400), dec!(420), "2024-02-16", dec!(2.50), 1)
//!     .await?;
//! oms.submit_order(&id).await?;
//! oms.shutdown().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Facade, services and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting Modules
// =============================================================================

/// YAML configuration loading and validation.
pub mod config;

/// Facade-level error types.
pub mod error;

/// Metrics recording.
pub mod observability;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::contract::{OptionContract, OptionRight};
pub use domain::order_execution::{
    LegInstrument, MultiLegOrder, OrderLeg, OrderSide, OrderStatus, OrderType, StrategyType,
    TimeInForce,
};
pub use domain::risk_management::{OrderValidator, ValidationError, ValidationPolicy};
pub use domain::shared::{BrokerOrderId, OrderId};

// Application re-exports
pub use application::dto::{OrderSummary, RecentOrderDto};
pub use application::ports::{
    Broker, BrokerError, BrokerGateway, ExecutionReport, GatewayError, StateStore, StoreError,
};
pub use application::services::{OmsSettings, OrderManagementSystem, StaleOrderPolicy};

// Infrastructure re-exports
pub use infrastructure::config::Container;
pub use infrastructure::gateway::{LiveGateway, PaperGateway, PaperGatewayConfig};
pub use infrastructure::persistence::{JsonFileStateStore, NullStateStore};

// Cross-cutting re-exports
pub use config::{Config, ConfigError, load_config, load_config_or_default};
pub use error::{ErrorCode, OmsError};
