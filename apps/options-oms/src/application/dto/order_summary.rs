//! Order Summary DTO

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order_execution::{MultiLegOrder, OrderRepository, OrderStatus, StrategyType};

/// Number of most recently created orders carried in a summary.
pub const RECENT_ORDER_COUNT: usize = 5;

/// Condensed view of a single order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentOrderDto {
    /// Order ID.
    pub order_id: String,
    /// Strategy.
    pub strategy_type: StrategyType,
    /// Status.
    pub status: OrderStatus,
    /// Signed net price per spread.
    pub net_debit_credit: Decimal,
    /// Number of spreads.
    pub quantity: u32,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<&MultiLegOrder> for RecentOrderDto {
    fn from(order: &MultiLegOrder) -> Self {
        Self {
            order_id: order.order_id().to_string(),
            strategy_type: order.strategy_type(),
            status: order.status(),
            net_debit_credit: order.net_debit_credit(),
            quantity: order.quantity(),
            created_at: order.created_at(),
        }
    }
}

/// Point-in-time statistics over every order the OMS knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Orders ever created.
    pub total_orders: usize,
    /// Orders not yet terminal.
    pub active_orders: usize,
    /// Orders that reached a terminal status.
    pub completed_orders: usize,
    /// Filled orders.
    pub filled: usize,
    /// Rejected orders.
    pub rejected: usize,
    /// Cancelled orders.
    pub cancelled: usize,
    /// Filled orders as a percentage of all orders.
    pub fill_rate: f64,
    /// Commission across all orders.
    pub total_commission: Decimal,
    /// Active order ids in creation order.
    pub active_order_ids: Vec<String>,
    /// Most recently created orders, oldest first.
    pub recent_orders: Vec<RecentOrderDto>,
    /// State writes that failed since startup.
    pub persistence_failures: u64,
    /// When the summary was taken.
    pub timestamp: DateTime<Utc>,
}

impl OrderSummary {
    /// Build a summary from the repository.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_repository(
        repo: &OrderRepository,
        persistence_failures: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let orders = repo.orders();
        let count = |status: OrderStatus| orders.iter().filter(|o| o.status() == status).count();

        let total_orders = orders.len();
        let filled = count(OrderStatus::Filled);
        let fill_rate = if total_orders == 0 {
            0.0
        } else {
            filled as f64 / total_orders as f64 * 100.0
        };

        Self {
            total_orders,
            active_orders: repo.active_count(),
            completed_orders: repo.completed_count(),
            filled,
            rejected: count(OrderStatus::Rejected),
            cancelled: count(OrderStatus::Cancelled),
            fill_rate,
            total_commission: orders.iter().map(MultiLegOrder::commission).sum(),
            active_order_ids: repo.active().map(|o| o.order_id().to_string()).collect(),
            recent_orders: orders
                .iter()
                .skip(total_orders.saturating_sub(RECENT_ORDER_COUNT))
                .map(RecentOrderDto::from)
                .collect(),
            persistence_failures,
            timestamp,
        }
    }
}
