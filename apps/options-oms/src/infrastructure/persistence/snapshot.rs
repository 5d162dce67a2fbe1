//! JSON snapshot records.
//!
//! Versioned, camelCase wire format for the state file. Records are plain
//! data; converting back into aggregates re-runs contract and leg
//! validation so a hand-edited file cannot smuggle in an invalid order.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::ports::StoreError;
use crate::domain::contract::{OptionContract, OptionRight};
use crate::domain::order_execution::{
    LegInstrument, MultiLegOrder, OrderLeg, OrderSide, OrderStatus, OrderType,
    ReconstitutedOrderParams, StrategyType, TimeInForce,
};
use crate::domain::shared::{BrokerOrderId, OrderId};

/// Current snapshot schema version.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Version header, read before the full snapshot.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotHeader {
    /// Schema version of the file.
    #[serde(default = "legacy_version")]
    pub schema_version: u32,
}

const fn legacy_version() -> u32 {
    SNAPSHOT_SCHEMA_VERSION
}

/// Full state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// Schema version. Files written before the field existed read as
    /// the current version.
    #[serde(default = "legacy_version")]
    pub schema_version: u32,
    /// When the snapshot was written.
    pub timestamp: DateTime<Utc>,
    /// Every order, in creation order.
    pub orders: Vec<OrderRecord>,
}

impl StateSnapshot {
    /// Capture a snapshot of `orders`.
    #[must_use]
    pub fn capture(orders: &[MultiLegOrder], timestamp: DateTime<Utc>) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            timestamp,
            orders: orders.iter().map(OrderRecord::from_order).collect(),
        }
    }

    /// Rebuild the orders in the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CorruptRecord` for the first record that fails validation.
    pub fn into_orders(self) -> Result<Vec<MultiLegOrder>, StoreError> {
        self.orders
            .into_iter()
            .map(OrderRecord::into_order)
            .collect()
    }
}

/// Serialized order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Order ID.
    pub order_id: String,
    /// Strategy type.
    pub strategy_type: StrategyType,
    /// Legs.
    pub legs: Vec<LegRecord>,
    /// Signed net price per spread.
    pub net_debit_credit: Decimal,
    /// Order type.
    pub order_type: OrderType,
    /// Time in force.
    pub time_in_force: TimeInForce,
    /// Number of spreads.
    pub quantity: u32,
    /// Status.
    pub status: OrderStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Submission time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Fill time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filled_at: Option<DateTime<Utc>>,
    /// Fill price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_price: Option<Decimal>,
    /// Commission.
    pub commission: Decimal,
    /// Notes.
    #[serde(default)]
    pub notes: String,
    /// Venue order ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_order_id: Option<String>,
}

impl OrderRecord {
    /// Build a record from an order.
    #[must_use]
    pub fn from_order(order: &MultiLegOrder) -> Self {
        Self {
            order_id: order.order_id().to_string(),
            strategy_type: order.strategy_type(),
            legs: order.legs().iter().map(LegRecord::from_leg).collect(),
            net_debit_credit: order.net_debit_credit(),
            order_type: order.order_type(),
            time_in_force: order.time_in_force(),
            quantity: order.quantity(),
            status: order.status(),
            created_at: order.created_at(),
            submitted_at: order.submitted_at(),
            filled_at: order.filled_at(),
            fill_price: order.fill_price(),
            commission: order.commission(),
            notes: order.notes().to_string(),
            broker_order_id: order.broker_order_id().map(ToString::to_string),
        }
    }

    /// Rebuild the order.
    ///
    /// # Errors
    ///
    /// Returns `CorruptRecord` if a leg or contract is invalid.
    pub fn into_order(self) -> Result<MultiLegOrder, StoreError> {
        let order_id = self.order_id;
        let corrupt = |message: String| StoreError::CorruptRecord {
            order_id: order_id.clone(),
            message,
        };

        if self.legs.is_empty() {
            return Err(corrupt("order has no legs".to_string()));
        }
        if self.quantity == 0 {
            return Err(corrupt("quantity must be positive".to_string()));
        }

        let legs = self
            .legs
            .into_iter()
            .map(LegRecord::into_leg)
            .collect::<Result<Vec<_>, String>>()
            .map_err(corrupt)?;

        Ok(MultiLegOrder::reconstitute(ReconstitutedOrderParams {
            order_id: OrderId::new(order_id),
            strategy_type: self.strategy_type,
            legs,
            net_debit_credit: self.net_debit_credit,
            order_type: self.order_type,
            time_in_force: self.time_in_force,
            quantity: self.quantity,
            status: self.status,
            created_at: self.created_at,
            submitted_at: self.submitted_at,
            filled_at: self.filled_at,
            fill_price: self.fill_price,
            commission: self.commission,
            notes: self.notes,
            broker_order_id: self.broker_order_id.map(BrokerOrderId::new),
        }))
    }
}

/// Serialized leg. The instrument is tagged by `instrumentType`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegRecord {
    /// Instrument, tagged by `instrumentType`.
    #[serde(flatten)]
    pub instrument: InstrumentRecord,
    /// Symbol.
    pub symbol: String,
    /// Side.
    pub side: OrderSide,
    /// Leg ratio.
    pub quantity: u32,
    /// Order type.
    pub order_type: OrderType,
    /// Limit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Decimal>,
}

impl LegRecord {
    fn from_leg(leg: &OrderLeg) -> Self {
        let instrument = match leg.instrument() {
            LegInstrument::Stock { .. } => InstrumentRecord::Stock,
            LegInstrument::Option(contract) => InstrumentRecord::Option {
                contract: ContractRecord::from_contract(contract),
            },
        };
        Self {
            instrument,
            symbol: leg.symbol().to_string(),
            side: leg.side(),
            quantity: leg.quantity(),
            order_type: leg.order_type(),
            limit_price: leg.limit_price(),
        }
    }

    fn into_leg(self) -> Result<OrderLeg, String> {
        let instrument = match self.instrument {
            InstrumentRecord::Stock => LegInstrument::Stock {
                symbol: self.symbol.clone(),
            },
            InstrumentRecord::Option { contract } => {
                LegInstrument::Option(contract.into_contract()?)
            }
        };

        let leg = OrderLeg::new(
            instrument,
            self.side,
            self.quantity,
            self.order_type,
            self.limit_price,
        )
        .map_err(|e| e.to_string())?;

        if leg.symbol() != self.symbol {
            return Err(format!(
                "leg symbol '{}' does not match contract symbol '{}'",
                self.symbol,
                leg.symbol()
            ));
        }
        Ok(leg)
    }
}

/// Instrument variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "instrumentType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentRecord {
    /// Equity leg.
    Stock,
    /// Option leg.
    Option {
        /// Contract specification.
        contract: ContractRecord,
    },
}

/// Serialized option contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    /// Underlying symbol.
    pub underlying: String,
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Call or put.
    pub right: OptionRight,
    /// Contract multiplier.
    pub multiplier: u32,
}

impl ContractRecord {
    fn from_contract(contract: &OptionContract) -> Self {
        Self {
            underlying: contract.underlying().to_string(),
            strike: contract.strike(),
            expiration: contract.expiration(),
            right: contract.right(),
            multiplier: contract.multiplier(),
        }
    }

    fn into_contract(self) -> Result<OptionContract, String> {
        OptionContract::new(
            self.underlying,
            self.strike,
            self.expiration,
            self.right,
            self.multiplier,
        )
        .map_err(|e| e.to_string())
    }
}
