//! Risk Management Bounded Context
//!
//! Pre-trade validation of multi-leg orders: notional, spread width and
//! market-day gating. No holiday calendar.

pub mod errors;
pub mod services;

pub use errors::ValidationError;
pub use services::{OrderValidator, ValidationPolicy};
