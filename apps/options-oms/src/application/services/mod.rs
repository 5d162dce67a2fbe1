//! Application Services
//!
//! The order management facade and the task that owns the order
//! repository behind it.

mod oms;
mod order_manager;
mod settings;

pub use oms::OrderManagementSystem;
pub use settings::{OmsSettings, StaleOrderPolicy};
