//! End-to-end scenarios against the OMS facade with the paper gateway.
//!
//! Validation runs with `market_hours_only` disabled so the scenarios pass
//! on any day of the week.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use options_oms::application::ports::{BrokerGateway, StateStore};
use options_oms::{
    ErrorCode, ExecutionReport, NullStateStore, OmsSettings, OrderId, OrderManagementSystem,
    OrderSide, OrderStatus, PaperGateway, PaperGatewayConfig, StaleOrderPolicy, StrategyType,
};

// =============================================================================
// Helpers
// =============================================================================

fn settings() -> OmsSettings {
    let mut settings = OmsSettings::default();
    settings.validation.market_hours_only = false;
    settings
}

fn paper(rejection_rate: f64, fill_delay: Duration) -> Arc<dyn BrokerGateway> {
    Arc::new(PaperGateway::new(PaperGatewayConfig {
        fill_delay,
        rejection_rate,
        ..PaperGatewayConfig::default()
    }))
}

async fn start(settings: OmsSettings, gateway: Arc<dyn BrokerGateway>) -> OrderManagementSystem {
    let store: Arc<dyn StateStore> = Arc::new(NullStateStore);
    OrderManagementSystem::start(settings, gateway, store)
        .await
        .unwrap()
}

async fn spy_spread(oms: &OrderManagementSystem) -> OrderId {
    oms.create_spread_order("SPY", dec!(400), dec!(420), "2024-02-16", dec!(2.50), 1)
        .await
        .unwrap()
}

const fn rank(status: OrderStatus) -> u8 {
    match status {
        OrderStatus::Pending => 0,
        OrderStatus::Submitted => 1,
        OrderStatus::PartiallyFilled => 2,
        OrderStatus::Filled
        | OrderStatus::Cancelled
        | OrderStatus::Rejected
        | OrderStatus::Expired => 3,
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn certain_rejection_rejects_within_submit() {
    let oms = start(settings(), paper(1.0, Duration::from_millis(50))).await;
    let id = spy_spread(&oms).await;

    let err = oms.submit_order(&id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::OrderRejected);
    assert_eq!(oms.order_status(&id).await.unwrap(), OrderStatus::Rejected);

    let order = oms.order(&id).await.unwrap();
    assert!(!order.notes().is_empty());
    assert!(order.submitted_at().is_none());
}

#[tokio::test]
async fn accepted_order_fills_after_delay() {
    let oms = start(settings(), paper(0.0, Duration::from_millis(50))).await;
    let id = spy_spread(&oms).await;

    oms.submit_order(&id).await.unwrap();
    assert_eq!(oms.order_status(&id).await.unwrap(), OrderStatus::Submitted);

    tokio::time::sleep(Duration::from_millis(150)).await;

    let order = oms.order(&id).await.unwrap();
    assert_eq!(order.status(), OrderStatus::Filled);
    assert_eq!(order.fill_price(), Some(dec!(2.50)));
    assert!(order.filled_at().unwrap() >= order.submitted_at().unwrap());
    assert!(order.broker_order_id().unwrap().as_str().starts_with("PAPER-"));
}

#[tokio::test]
async fn cancel_before_fill_wins() {
    let oms = start(settings(), paper(0.0, Duration::from_millis(200))).await;
    let id = spy_spread(&oms).await;
    oms.submit_order(&id).await.unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    oms.cancel_order(&id).await.unwrap();

    tokio::time::sleep(Duration::from_millis(250)).await;
    let order = oms.order(&id).await.unwrap();
    assert_eq!(order.status(), OrderStatus::Cancelled);
    assert!(order.fill_price().is_none());
}

#[tokio::test]
async fn spread_order_has_expected_legs_and_commission() {
    let mut settings = settings();
    settings.commission_per_contract = dec!(0.65);
    let oms = start(settings, paper(0.0, Duration::from_secs(5))).await;
    let id = spy_spread(&oms).await;

    let order = oms.order(&id).await.unwrap();
    assert_eq!(order.strategy_type(), StrategyType::BullCallSpread);
    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(order.net_debit_credit(), dec!(2.50));
    assert_eq!(order.quantity(), 1);
    assert_eq!(order.commission(), dec!(1.30));

    let legs = order.legs();
    assert_eq!(legs.len(), 2);
    assert_eq!(legs[0].side(), OrderSide::BuyToOpen);
    assert_eq!(legs[0].contract().unwrap().strike(), dec!(400));
    assert_eq!(legs[1].side(), OrderSide::SellToOpen);
    assert_eq!(legs[1].contract().unwrap().strike(), dec!(420));
}

#[tokio::test]
async fn spread_wider_than_limit_fails_validation() {
    let mut settings = settings();
    settings.validation.max_spread_width = dec!(10);
    let oms = start(settings, paper(0.0, Duration::from_secs(5))).await;
    let id = spy_spread(&oms).await;

    let err = oms.submit_order(&id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::SpreadWidthExceeded);

    let order = oms.order(&id).await.unwrap();
    assert_eq!(order.status(), OrderStatus::Rejected);
    assert!(!order.notes().is_empty());
}

#[tokio::test]
async fn notional_over_limit_fails_validation() {
    let mut settings = settings();
    settings.validation.max_order_value = dec!(1000);
    let oms = start(settings, paper(0.0, Duration::from_secs(5))).await;
    let id = oms
        .create_spread_order("SPY", dec!(400), dec!(420), "2024-02-16", dec!(2.50), 10)
        .await
        .unwrap();

    let err = oms.submit_order(&id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotionalLimitExceeded);
    assert_eq!(oms.order_status(&id).await.unwrap(), OrderStatus::Rejected);
}

#[tokio::test]
async fn exit_spread_is_validated_like_entry() {
    let mut settings = settings();
    settings.validation.max_spread_width = dec!(10);
    let oms = start(settings, paper(0.0, Duration::from_secs(5))).await;
    let id = oms
        .create_spread_exit_order("SPY", dec!(400), dec!(420), "2024-02-16", dec!(4.00), 1)
        .await
        .unwrap();

    let err = oms.submit_order(&id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::SpreadWidthExceeded);
}

// =============================================================================
// Properties
// =============================================================================

#[tokio::test]
async fn ten_thousand_ids_are_unique() {
    let oms = start(settings(), paper(0.0, Duration::from_secs(5))).await;

    let mut ids = HashSet::new();
    for _ in 0..10_000 {
        assert!(ids.insert(spy_spread(&oms).await));
    }

    assert_eq!(oms.orders().await.unwrap().len(), 10_000);
}

#[tokio::test]
async fn second_cancel_is_invalid_state() {
    let oms = start(settings(), paper(0.0, Duration::from_secs(5))).await;
    let id = spy_spread(&oms).await;

    oms.cancel_order(&id).await.unwrap();
    let err = oms.cancel_order(&id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidOrderState);
    assert_eq!(oms.order_status(&id).await.unwrap(), OrderStatus::Cancelled);
}

#[tokio::test]
async fn status_never_moves_backwards() {
    let oms = start(settings(), paper(0.0, Duration::from_millis(40))).await;
    let id = spy_spread(&oms).await;

    let mut seen = vec![oms.order_status(&id).await.unwrap()];
    oms.submit_order(&id).await.unwrap();
    for _ in 0..10 {
        seen.push(oms.order_status(&id).await.unwrap());
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tokio::time::sleep(Duration::from_millis(100)).await;
    seen.push(oms.order_status(&id).await.unwrap());

    assert!(seen.windows(2).all(|pair| rank(pair[0]) <= rank(pair[1])));
    assert_eq!(seen.last(), Some(&OrderStatus::Filled));

    // Terminal orders stay terminal whatever the caller does next.
    assert!(oms.submit_order(&id).await.is_err());
    assert!(oms.cancel_order(&id).await.is_err());
    oms.report_execution(ExecutionReport::Rejected {
        order_id: id.clone(),
        reason: "late reject".to_string(),
    })
    .unwrap();
    assert_eq!(oms.order_status(&id).await.unwrap(), OrderStatus::Filled);
}

#[tokio::test]
async fn summary_reflects_outcomes() {
    let oms = start(settings(), paper(0.0, Duration::from_millis(20))).await;
    let filled = spy_spread(&oms).await;
    let cancelled = spy_spread(&oms).await;
    let pending = spy_spread(&oms).await;

    oms.submit_order(&filled).await.unwrap();
    oms.cancel_order(&cancelled).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let summary = oms.order_summary().await.unwrap();
    assert_eq!(summary.total_orders, 3);
    assert_eq!(summary.filled, 1);
    assert_eq!(summary.cancelled, 1);
    assert_eq!(summary.rejected, 0);
    assert_eq!(summary.active_orders, 1);
    assert_eq!(summary.completed_orders, 2);
    assert_eq!(summary.active_order_ids, vec![pending.to_string()]);
    assert_eq!(summary.total_commission, dec!(3.90));
    assert_eq!(summary.recent_orders.len(), 3);
}

// =============================================================================
// Stale orders and shutdown
// =============================================================================

#[tokio::test]
async fn stale_submitted_order_expires_under_expire_policy() {
    let mut settings = settings();
    settings.stale_order_policy = StaleOrderPolicy::Expire;
    settings.submitted_grace_period = Duration::ZERO;
    settings.sweep_interval = Duration::from_millis(20);

    let oms = start(settings, paper(0.0, Duration::from_secs(10))).await;
    let id = spy_spread(&oms).await;
    oms.submit_order(&id).await.unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(oms.order_status(&id).await.unwrap(), OrderStatus::Expired);

    oms.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_cancels_active_orders_and_closes_facade() {
    let oms = start(settings(), paper(0.0, Duration::from_secs(10))).await;
    let pending = spy_spread(&oms).await;
    let submitted = spy_spread(&oms).await;
    oms.submit_order(&submitted).await.unwrap();

    tokio::time::timeout(Duration::from_secs(2), oms.shutdown())
        .await
        .expect("shutdown should not wait for the fill delay")
        .unwrap();

    for id in [&pending, &submitted] {
        let err = oms.order_status(id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ShutDown);
    }
    assert_eq!(
        oms.create_spread_order("SPY", dec!(400), dec!(420), "2024-02-16", dec!(2.50), 1)
            .await
            .unwrap_err()
            .code(),
        ErrorCode::ShutDown
    );
}
