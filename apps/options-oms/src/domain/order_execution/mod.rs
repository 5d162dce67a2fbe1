//! Order Execution Bounded Context
//!
//! Manages the lifecycle of multi-leg orders from creation to a terminal
//! status.
//!
//! # Key Concepts
//!
//! - **MultiLegOrder Aggregate**: The root entity; legs are fixed at creation
//! - **State Machine**: Status only moves forward
//! - **Repository**: Single-owner arena with active and completed sets

pub mod aggregate;
pub mod errors;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use aggregate::{
    LegInstrument, MultiLegOrder, NewOrderParams, OrderLeg, ReconstitutedOrderParams,
};
pub use errors::OrderError;
pub use repository::OrderRepository;
pub use services::OrderStateMachine;
pub use value_objects::{OrderSide, OrderStatus, OrderType, StrategyType, TimeInForce};
