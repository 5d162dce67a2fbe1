//! Dependency Injection Container
//!
//! Wires the gateway and state store selected by [`Config`] and starts the
//! order management system on top of them.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ports::{Broker, BrokerGateway, StateStore};
use crate::application::services::OrderManagementSystem;
use crate::config::{Config, ConfigError, validate_config};
use crate::error::OmsError;
use crate::infrastructure::gateway::{LiveGateway, PaperGateway};
use crate::infrastructure::persistence::{JsonFileStateStore, NullStateStore};

/// Dependency injection container.
///
/// Use [`Container::paper`] for simulated execution or [`Container::live`]
/// to route orders to an external broker.
pub struct Container {
    config: Config,
    gateway: Arc<dyn BrokerGateway>,
    store: Arc<dyn StateStore>,
}

impl Container {
    /// Build a container backed by the paper fill simulator.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the configuration is invalid or asks for
    /// live trading, which needs a broker.
    pub fn paper(config: Config) -> Result<Self, ConfigError> {
        validate_config(&config)?;
        if !config.execution.paper_trading {
            return Err(ConfigError::ValidationError(
                "execution.paper_trading is false but no live broker was supplied".to_string(),
            ));
        }

        let gateway = Arc::new(PaperGateway::new(
            config.execution.to_paper_gateway_config(),
        ));
        Ok(Self::assemble(config, gateway))
    }

    /// Build a container that routes orders to `broker`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the configuration is invalid.
    pub fn live<B: Broker + 'static>(config: Config, broker: Arc<B>) -> Result<Self, ConfigError> {
        validate_config(&config)?;
        if config.execution.paper_trading {
            warn!("execution.paper_trading is true but a live broker was supplied; using the broker");
        }

        let gateway = Arc::new(LiveGateway::new(broker));
        Ok(Self::assemble(config, gateway))
    }

    fn assemble(config: Config, gateway: Arc<dyn BrokerGateway>) -> Self {
        if config.execution.enable_partial_fills {
            warn!("execution.enable_partial_fills is not supported yet and will be ignored");
        }

        let store: Arc<dyn StateStore> = if config.persistence.enabled {
            info!(
                path = %config.persistence.state_file.display(),
                "Persisting order state"
            );
            Arc::new(JsonFileStateStore::new(config.persistence.state_file.clone()))
        } else {
            warn!("Persistence disabled; orders will not survive a restart");
            Arc::new(NullStateStore)
        };

        Self {
            config,
            gateway,
            store,
        }
    }

    /// Get the configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Get the execution gateway.
    pub fn gateway(&self) -> Arc<dyn BrokerGateway> {
        Arc::clone(&self.gateway)
    }

    /// Get the state store.
    pub fn store(&self) -> Arc<dyn StateStore> {
        Arc::clone(&self.store)
    }

    /// Load stored orders and start the OMS.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the state file cannot be loaded.
    pub async fn start_oms(&self) -> Result<OrderManagementSystem, OmsError> {
        OrderManagementSystem::start(self.config.to_oms_settings(), self.gateway(), self.store())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockBroker;
    use crate::domain::order_execution::OrderStatus;
    use crate::domain::shared::BrokerOrderId;
    use rust_decimal_macros::dec;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.persistence.enabled = false;
        config.limits.market_hours_only = false;
        config
    }

    #[test]
    fn paper_container_uses_paper_gateway() {
        let container = Container::paper(test_config()).unwrap();
        assert_eq!(container.gateway().name(), "paper");
    }

    #[test]
    fn paper_container_refuses_live_config() {
        let mut config = test_config();
        config.execution.paper_trading = false;
        assert!(matches!(
            Container::paper(config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = test_config();
        config.execution.rejection_rate = 1.5;
        assert!(Container::paper(config).is_err());
    }

    #[tokio::test]
    async fn live_container_submits_through_broker() {
        let mut broker = MockBroker::new();
        broker
            .expect_submit_order()
            .times(1)
            .returning(|_| Ok(BrokerOrderId::new("ALPACA-42")));

        let mut config = test_config();
        config.execution.paper_trading = false;
        let container = Container::live(config, Arc::new(broker)).unwrap();
        assert_eq!(container.gateway().name(), "live");

        let oms = container.start_oms().await.unwrap();
        let id = oms
            .create_spread_order("SPY", dec!(400), dec!(420), "2024-02-16", dec!(2.50), 1)
            .await
            .unwrap();
        oms.submit_order(&id).await.unwrap();

        let order = oms.order(&id).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Submitted);
        assert_eq!(order.broker_order_id().map(BrokerOrderId::as_str), Some("ALPACA-42"));
    }
}
