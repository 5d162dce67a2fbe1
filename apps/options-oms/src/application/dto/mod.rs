//! Data Transfer Objects (DTOs)
//!
//! Read models returned by the OMS facade.

mod order_summary;

pub use order_summary::{OrderSummary, RECENT_ORDER_COUNT, RecentOrderDto};
