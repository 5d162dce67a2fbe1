//! Order Management System Facade
//!
//! Public entry point for creating, submitting, cancelling and inspecting
//! multi-leg orders. The facade is a cheap, cloneable handle; every call is
//! forwarded to the [`OrderManager`](super::order_manager) task that owns
//! the repository and answered over a oneshot channel.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use super::order_manager::{Command, OrderManager, Reply};
use super::settings::OmsSettings;
use crate::application::dto::OrderSummary;
use crate::application::ports::{BrokerGateway, ExecutionReport, ReportSender, StateStore};
use crate::domain::contract::{OptionContract, parse_expiration};
use crate::domain::order_execution::{
    MultiLegOrder, NewOrderParams, OrderError, OrderLeg, OrderRepository, OrderSide, OrderStatus,
    OrderType, StrategyType, TimeInForce,
};
use crate::domain::shared::OrderId;
use crate::error::OmsError;
use crate::observability::update_active_orders;

const COMMAND_BUFFER: usize = 256;

/// Handle to a running order management system.
#[derive(Debug, Clone)]
pub struct OrderManagementSystem {
    commands: mpsc::Sender<Command>,
    reports: ReportSender,
    commission_per_contract: Decimal,
}

impl OrderManagementSystem {
    /// Load stored orders and start the order manager task.
    ///
    /// # Errors
    ///
    /// Returns `Config` for unusable settings, `Persistence` if the stored
    /// snapshot cannot be read, or `InvalidOrder` if it holds duplicate
    /// order ids.
    pub async fn start(
        settings: OmsSettings,
        gateway: Arc<dyn BrokerGateway>,
        store: Arc<dyn StateStore>,
    ) -> Result<Self, OmsError> {
        settings.validate()?;
        let repo = OrderRepository::restore(store.load().await?)?;
        info!(
            gateway = gateway.name(),
            restored = repo.len(),
            active = repo.active_count(),
            stale_order_policy = ?settings.stale_order_policy,
            "Order management system started"
        );
        update_active_orders(repo.active_count());

        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (report_tx, report_rx) = mpsc::unbounded_channel();
        let commission_per_contract = settings.commission_per_contract;

        let manager = OrderManager::new(repo, settings, gateway, store, report_tx.clone());
        tokio::spawn(manager.run(command_rx, report_rx));

        Ok(Self {
            commands: command_tx,
            reports: report_tx,
            commission_per_contract,
        })
    }

    /// Create a bull call spread entry: buy the long call, sell the short
    /// call. The order is stored as PENDING and not submitted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOrder` for a bad strike, expiration, underlying or
    /// quantity.
    pub async fn create_spread_order(
        &self,
        underlying: &str,
        long_strike: Decimal,
        short_strike: Decimal,
        expiration: &str,
        net_debit: Decimal,
        quantity: u32,
    ) -> Result<OrderId, OmsError> {
        let order = self.build_spread(SpreadRequest {
            strategy_type: StrategyType::BullCallSpread,
            underlying,
            long_strike,
            short_strike,
            expiration,
            long_side: OrderSide::BuyToOpen,
            short_side: OrderSide::SellToOpen,
            net_debit_credit: net_debit,
            quantity,
        })?;
        self.request(|reply| Command::Create { order, reply }).await
    }

    /// Create the closing order for a bull call spread: sell the long call,
    /// buy back the short call, for a net credit.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_spread_order`].
    pub async fn create_spread_exit_order(
        &self,
        underlying: &str,
        long_strike: Decimal,
        short_strike: Decimal,
        expiration: &str,
        net_credit: Decimal,
        quantity: u32,
    ) -> Result<OrderId, OmsError> {
        let order = self.build_spread(SpreadRequest {
            strategy_type: StrategyType::BullCallSpreadExit,
            underlying,
            long_strike,
            short_strike,
            expiration,
            long_side: OrderSide::SellToClose,
            short_side: OrderSide::BuyToClose,
            net_debit_credit: -net_credit,
            quantity,
        })?;
        self.request(|reply| Command::Create { order, reply }).await
    }

    /// Validate a PENDING order and hand it to the gateway.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown id
    /// - `InvalidState` unless the order is PENDING
    /// - `Validation` or `Rejected`; the order is now REJECTED
    /// - `Gateway` if the venue call failed; the order is now REJECTED
    pub async fn submit_order(&self, order_id: &OrderId) -> Result<(), OmsError> {
        let order_id = order_id.clone();
        self.request(|reply| Command::Submit { order_id, reply })
            .await
    }

    /// Cancel a non-terminal order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidState` for a terminal order, or `Gateway`
    /// if the venue refused the cancel (the order is left unchanged).
    pub async fn cancel_order(&self, order_id: &OrderId) -> Result<(), OmsError> {
        let order_id = order_id.clone();
        self.request(|reply| Command::Cancel { order_id, reply })
            .await
    }

    /// Current status of an order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn order_status(&self, order_id: &OrderId) -> Result<OrderStatus, OmsError> {
        Ok(self.order(order_id).await?.status())
    }

    /// Snapshot of a single order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn order(&self, order_id: &OrderId) -> Result<MultiLegOrder, OmsError> {
        let order_id = order_id.clone();
        self.request(|reply| Command::Get { order_id, reply }).await
    }

    /// Snapshot of every order in creation order.
    ///
    /// # Errors
    ///
    /// Returns `ShutDown` once the OMS has stopped.
    pub async fn orders(&self) -> Result<Vec<MultiLegOrder>, OmsError> {
        self.request(|reply| Command::List { reply }).await
    }

    /// Aggregate statistics.
    ///
    /// # Errors
    ///
    /// Returns `ShutDown` once the OMS has stopped.
    pub async fn order_summary(&self) -> Result<OrderSummary, OmsError> {
        self.request(|reply| Command::Summary { reply }).await
    }

    /// Feed an execution report from an external venue integration.
    ///
    /// # Errors
    ///
    /// Returns `ShutDown` once the OMS has stopped.
    pub fn report_execution(&self, report: ExecutionReport) -> Result<(), OmsError> {
        self.reports.send(report).map_err(|_| OmsError::ShutDown)
    }

    /// Cancel every active order, persist, wait for in-flight fills and
    /// stop the order manager.
    ///
    /// # Errors
    ///
    /// Returns `ShutDown` if the OMS was already stopped.
    pub async fn shutdown(&self) -> Result<(), OmsError> {
        let (reply, done) = oneshot::channel();
        self.commands
            .send(Command::Shutdown { reply })
            .await
            .map_err(|_| OmsError::ShutDown)?;
        done.await.map_err(|_| OmsError::ShutDown)
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, OmsError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| OmsError::ShutDown)?;
        response.await.map_err(|_| OmsError::ShutDown)?
    }

    fn build_spread(&self, request: SpreadRequest<'_>) -> Result<MultiLegOrder, OmsError> {
        let expiration = parse_expiration(request.expiration).map_err(OrderError::from)?;
        let long = OptionContract::call(request.underlying, request.long_strike, expiration)
            .map_err(OrderError::from)?;
        let short = OptionContract::call(request.underlying, request.short_strike, expiration)
            .map_err(OrderError::from)?;

        let legs = vec![
            OrderLeg::option(long, request.long_side, 1)?,
            OrderLeg::option(short, request.short_side, 1)?,
        ];

        Ok(MultiLegOrder::new(NewOrderParams {
            strategy_type: request.strategy_type,
            legs,
            net_debit_credit: request.net_debit_credit,
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::Day,
            quantity: request.quantity,
            commission_per_contract: self.commission_per_contract,
            created_at: Utc::now(),
        })?)
    }
}

struct SpreadRequest<'a> {
    strategy_type: StrategyType,
    underlying: &'a str,
    long_strike: Decimal,
    short_strike: Decimal,
    expiration: &'a str,
    long_side: OrderSide,
    short_side: OrderSide,
    net_debit_credit: Decimal,
    quantity: u32,
}
