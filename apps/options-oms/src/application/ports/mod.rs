//! Application Ports (Driven)
//!
//! Ports define interfaces for the external systems the OMS depends on:
//! the brokerage, the execution venue, and the state store.

mod broker_port;
mod gateway_port;
mod state_store_port;

#[cfg(test)]
pub use broker_port::MockBroker;
pub use broker_port::{Broker, BrokerError, LegRequest, SubmitOrderRequest};
pub use gateway_port::{BrokerGateway, ExecutionReport, GatewayAck, GatewayError, ReportSender};
pub use state_store_port::{StateStore, StoreError};
