//! Multi-Leg Order Aggregate Root
//!
//! The `MultiLegOrder` aggregate owns the legs of a composite order and
//! its lifecycle. Legs are fixed at construction; every status change goes
//! through [`OrderStateMachine`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::OrderLeg;
use crate::domain::order_execution::errors::OrderError;
use crate::domain::order_execution::services::OrderStateMachine;
use crate::domain::order_execution::value_objects::{
    OrderStatus, OrderType, StrategyType, TimeInForce,
};
use crate::domain::shared::{BrokerOrderId, OrderId};

/// Parameters for creating a new order.
#[derive(Debug, Clone)]
pub struct NewOrderParams {
    /// Strategy that produced the order.
    pub strategy_type: StrategyType,
    /// Legs in execution order.
    pub legs: Vec<OrderLeg>,
    /// Signed net price per spread: positive is a debit, negative a credit.
    pub net_debit_credit: Decimal,
    /// Order type.
    pub order_type: OrderType,
    /// Time in force.
    pub time_in_force: TimeInForce,
    /// Number of spreads.
    pub quantity: u32,
    /// Commission charged per contract.
    pub commission_per_contract: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Parameters for reconstituting an order from storage.
///
/// The stored commission is restored verbatim, never recomputed.
#[derive(Debug, Clone)]
pub struct ReconstitutedOrderParams {
    /// Order identifier.
    pub order_id: OrderId,
    /// Strategy type.
    pub strategy_type: StrategyType,
    /// Legs.
    pub legs: Vec<OrderLeg>,
    /// Signed net price per spread.
    pub net_debit_credit: Decimal,
    /// Order type.
    pub order_type: OrderType,
    /// Time in force.
    pub time_in_force: TimeInForce,
    /// Number of spreads.
    pub quantity: u32,
    /// Current status.
    pub status: OrderStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Submission timestamp.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Fill timestamp.
    pub filled_at: Option<DateTime<Utc>>,
    /// Fill price.
    pub fill_price: Option<Decimal>,
    /// Commission.
    pub commission: Decimal,
    /// Free-form notes.
    pub notes: String,
    /// Venue-assigned order id.
    pub broker_order_id: Option<BrokerOrderId>,
}

/// Multi-Leg Order Aggregate Root.
#[allow(clippy::struct_field_names)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiLegOrder {
    order_id: OrderId,
    strategy_type: StrategyType,
    legs: Vec<OrderLeg>,
    net_debit_credit: Decimal,
    order_type: OrderType,
    time_in_force: TimeInForce,
    quantity: u32,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
    filled_at: Option<DateTime<Utc>>,
    fill_price: Option<Decimal>,
    commission: Decimal,
    notes: String,
    broker_order_id: Option<BrokerOrderId>,
}

impl MultiLegOrder {
    /// Create a new order in `Pending` status.
    ///
    /// # Errors
    ///
    /// Returns error if there are no legs, quantity is zero, the commission
    /// rate is negative, or a limit order carries a zero net price.
    pub fn new(params: NewOrderParams) -> Result<Self, OrderError> {
        if params.legs.is_empty() {
            return Err(OrderError::invalid(
                "legs",
                "Order must have at least one leg",
            ));
        }
        if params.quantity == 0 {
            return Err(OrderError::invalid("quantity", "Quantity must be positive"));
        }
        if params.commission_per_contract < Decimal::ZERO {
            return Err(OrderError::invalid(
                "commission_per_contract",
                "Commission rate cannot be negative",
            ));
        }
        if params.order_type.requires_limit_price() && params.net_debit_credit.is_zero() {
            return Err(OrderError::invalid(
                "net_debit_credit",
                "Limit orders require a non-zero net price",
            ));
        }

        let commission = Self::calculate_commission(
            &params.legs,
            params.quantity,
            params.commission_per_contract,
        );

        Ok(Self {
            order_id: OrderId::generate(params.strategy_type.id_prefix(), params.created_at),
            strategy_type: params.strategy_type,
            legs: params.legs,
            net_debit_credit: params.net_debit_credit,
            order_type: params.order_type,
            time_in_force: params.time_in_force,
            quantity: params.quantity,
            status: OrderStatus::Pending,
            created_at: params.created_at,
            submitted_at: None,
            filled_at: None,
            fill_price: None,
            commission,
            notes: String::new(),
            broker_order_id: None,
        })
    }

    /// Reconstitute an order from stored state.
    #[must_use]
    pub fn reconstitute(params: ReconstitutedOrderParams) -> Self {
        Self {
            order_id: params.order_id,
            strategy_type: params.strategy_type,
            legs: params.legs,
            net_debit_credit: params.net_debit_credit,
            order_type: params.order_type,
            time_in_force: params.time_in_force,
            quantity: params.quantity,
            status: params.status,
            created_at: params.created_at,
            submitted_at: params.submitted_at,
            filled_at: params.filled_at,
            fill_price: params.fill_price,
            commission: params.commission,
            notes: params.notes,
            broker_order_id: params.broker_order_id,
        }
    }

    /// Commission for a set of legs: total contracts across legs times the
    /// order quantity times the per-contract rate.
    #[must_use]
    pub fn calculate_commission(legs: &[OrderLeg], quantity: u32, rate: Decimal) -> Decimal {
        let contracts: u64 = legs.iter().map(|leg| u64::from(leg.quantity())).sum();
        Decimal::from(contracts) * Decimal::from(quantity) * rate
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the order ID.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Get the strategy type.
    #[must_use]
    pub const fn strategy_type(&self) -> StrategyType {
        self.strategy_type
    }

    /// Get the legs.
    #[must_use]
    pub fn legs(&self) -> &[OrderLeg] {
        &self.legs
    }

    /// Get the signed net price per spread.
    #[must_use]
    pub const fn net_debit_credit(&self) -> Decimal {
        self.net_debit_credit
    }

    /// Get the order type.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Get the time in force.
    #[must_use]
    pub const fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    /// Get the number of spreads.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the submission timestamp.
    #[must_use]
    pub const fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    /// Get the fill timestamp.
    #[must_use]
    pub const fn filled_at(&self) -> Option<DateTime<Utc>> {
        self.filled_at
    }

    /// Get the fill price.
    #[must_use]
    pub const fn fill_price(&self) -> Option<Decimal> {
        self.fill_price
    }

    /// Get the commission.
    #[must_use]
    pub const fn commission(&self) -> Decimal {
        self.commission
    }

    /// Get the notes.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Get the venue-assigned order id.
    #[must_use]
    pub const fn broker_order_id(&self) -> Option<&BrokerOrderId> {
        self.broker_order_id.as_ref()
    }

    /// Notional value: `|net| × quantity × 100`.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.net_debit_credit.abs() * Decimal::from(self.quantity) * Decimal::ONE_HUNDRED
    }

    /// Strikes of all option legs.
    pub fn strikes(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.legs
            .iter()
            .filter_map(|leg| leg.contract().map(|c| c.strike()))
    }

    // ========================================================================
    // State Transitions
    // ========================================================================

    /// Mark the order as accepted by the gateway.
    ///
    /// # Errors
    ///
    /// Returns error if the order is not `Pending`.
    pub fn mark_submitted(
        &mut self,
        broker_order_id: Option<BrokerOrderId>,
        at: DateTime<Utc>,
    ) -> Result<(), OrderError> {
        self.transition(OrderStatus::Submitted)?;
        self.submitted_at = Some(at);
        self.broker_order_id = broker_order_id;
        Ok(())
    }

    /// Fill the order.
    ///
    /// # Errors
    ///
    /// Returns error if the order is not `Submitted`.
    pub fn fill(&mut self, price: Decimal, at: DateTime<Utc>) -> Result<(), OrderError> {
        self.transition(OrderStatus::Filled)?;
        self.fill_price = Some(price);
        self.filled_at = Some(at);
        Ok(())
    }

    /// Reject the order, recording the reason in the notes.
    ///
    /// # Errors
    ///
    /// Returns error if the order is neither `Pending` nor `Submitted`.
    pub fn reject(&mut self, reason: impl Into<String>) -> Result<(), OrderError> {
        self.transition(OrderStatus::Rejected)?;
        self.notes = reason.into();
        Ok(())
    }

    /// Cancel the order.
    ///
    /// # Errors
    ///
    /// Returns `CannotCancel` if the order is already terminal.
    pub fn cancel(&mut self, note: impl Into<String>) -> Result<(), OrderError> {
        if !self.status.is_cancelable() {
            return Err(OrderError::CannotCancel {
                status: self.status,
            });
        }
        self.transition(OrderStatus::Cancelled)?;
        self.notes = note.into();
        Ok(())
    }

    /// Expire a submitted order that never received a report.
    ///
    /// # Errors
    ///
    /// Returns error if the order is not `Submitted`.
    pub fn expire(&mut self, note: impl Into<String>) -> Result<(), OrderError> {
        self.transition(OrderStatus::Expired)?;
        self.notes = note.into();
        Ok(())
    }

    fn transition(&mut self, to: OrderStatus) -> Result<(), OrderError> {
        OrderStateMachine::validate_transition(self.status, to)?;
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::{OptionContract, parse_expiration};
    use crate::domain::order_execution::value_objects::OrderSide;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn leg(strike: Decimal, side: OrderSide) -> OrderLeg {
        let contract =
            OptionContract::call("SPY", strike, parse_expiration("2024-02-16").unwrap()).unwrap();
        OrderLeg::option(contract, side, 1).unwrap()
    }

    fn params(quantity: u32) -> NewOrderParams {
        NewOrderParams {
            strategy_type: StrategyType::BullCallSpread,
            legs: vec![
                leg(dec!(400), OrderSide::BuyToOpen),
                leg(dec!(420), OrderSide::SellToOpen),
            ],
            net_debit_credit: dec!(2.50),
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::Day,
            quantity,
            commission_per_contract: dec!(0.65),
            created_at: Utc::now(),
        }
    }

    fn pending() -> MultiLegOrder {
        MultiLegOrder::new(params(1)).unwrap()
    }

    #[test]
    fn new_order_is_pending_with_commission() {
        let order = pending();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.commission(), dec!(1.30));
        assert!(order.order_id().as_str().starts_with("BCS_"));
        assert!(order.submitted_at().is_none());
        assert!(order.notes().is_empty());
    }

    #[test]
    fn new_order_requires_legs() {
        let mut p = params(1);
        p.legs.clear();
        assert!(MultiLegOrder::new(p).is_err());
    }

    #[test]
    fn new_order_requires_quantity() {
        assert!(MultiLegOrder::new(params(0)).is_err());
    }

    #[test]
    fn limit_order_requires_net_price() {
        let mut p = params(1);
        p.net_debit_credit = Decimal::ZERO;
        assert!(MultiLegOrder::new(p).is_err());
    }

    #[test]
    fn notional_and_strikes() {
        let order = MultiLegOrder::new(params(3)).unwrap();
        assert_eq!(order.notional(), dec!(750));
        assert_eq!(order.strikes().collect::<Vec<_>>(), vec![dec!(400), dec!(420)]);
    }

    #[test]
    fn submit_then_fill() {
        let mut order = pending();
        let now = Utc::now();
        order
            .mark_submitted(Some(BrokerOrderId::new("PAPER-1")), now)
            .unwrap();
        assert_eq!(order.status(), OrderStatus::Submitted);
        assert_eq!(order.submitted_at(), Some(now));

        order.fill(dec!(2.50), now).unwrap();
        assert_eq!(order.status(), OrderStatus::Filled);
        assert_eq!(order.fill_price(), Some(dec!(2.50)));
        assert_eq!(order.broker_order_id().unwrap().as_str(), "PAPER-1");
    }

    #[test]
    fn cannot_fill_pending_order() {
        let mut order = pending();
        assert!(order.fill(dec!(2.50), Utc::now()).is_err());
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn reject_records_reason() {
        let mut order = pending();
        order.reject("Order value exceeds limit").unwrap();
        assert_eq!(order.status(), OrderStatus::Rejected);
        assert_eq!(order.notes(), "Order value exceeds limit");
    }

    #[test]
    fn cancel_twice_fails_without_change() {
        let mut order = pending();
        order.cancel("Cancelled by user").unwrap();
        let before = order.clone();
        let err = order.cancel("again").unwrap_err();
        assert!(matches!(err, OrderError::CannotCancel { .. }));
        assert_eq!(order, before);
    }

    #[test]
    fn expire_only_from_submitted() {
        let mut order = pending();
        assert!(order.expire("stale").is_err());
        order.mark_submitted(None, Utc::now()).unwrap();
        order.expire("stale").unwrap();
        assert_eq!(order.status(), OrderStatus::Expired);
    }

    #[test]
    fn terminal_order_rejects_every_transition() {
        let mut order = pending();
        order.mark_submitted(None, Utc::now()).unwrap();
        order.fill(dec!(2.50), Utc::now()).unwrap();

        assert!(order.mark_submitted(None, Utc::now()).is_err());
        assert!(order.reject("late").is_err());
        assert!(order.cancel("late").is_err());
        assert!(order.expire("late").is_err());
        assert_eq!(order.status(), OrderStatus::Filled);
    }

    #[test]
    fn reconstitute_keeps_stored_commission() {
        let order = pending();
        let restored = MultiLegOrder::reconstitute(ReconstitutedOrderParams {
            order_id: order.order_id().clone(),
            strategy_type: order.strategy_type(),
            legs: order.legs().to_vec(),
            net_debit_credit: order.net_debit_credit(),
            order_type: order.order_type(),
            time_in_force: order.time_in_force(),
            quantity: order.quantity(),
            status: order.status(),
            created_at: order.created_at(),
            submitted_at: None,
            filled_at: None,
            fill_price: None,
            commission: dec!(9.99),
            notes: String::new(),
            broker_order_id: None,
        });
        assert_eq!(restored.commission(), dec!(9.99));
    }

    proptest! {
        #[test]
        fn commission_is_contracts_times_quantity_times_rate(
            quantity in 1u32..10_000,
            rate_cents in 0i64..500,
        ) {
            let rate = Decimal::new(rate_cents, 2);
            let mut p = params(quantity);
            p.commission_per_contract = rate;
            let order = MultiLegOrder::new(p).unwrap();
            let contracts: u32 = order.legs().iter().map(OrderLeg::quantity).sum();
            prop_assert_eq!(
                order.commission(),
                Decimal::from(contracts) * Decimal::from(quantity) * rate
            );
        }
    }
}
