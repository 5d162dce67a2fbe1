//! Order Aggregate
//!
//! `MultiLegOrder` is the root entity for order lifecycle management.

mod order;
mod order_leg;

pub use order::{MultiLegOrder, NewOrderParams, ReconstitutedOrderParams};
pub use order_leg::{LegInstrument, OrderLeg};
