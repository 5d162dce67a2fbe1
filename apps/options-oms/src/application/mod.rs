//! Application Layer
//!
//! The application layer orchestrates domain logic for the OMS.
//! It defines:
//!
//! - **Ports**: Interfaces for gateways, brokers and state storage
//! - **Services**: The order management facade and its repository owner
//! - **DTOs**: Read models returned to callers

pub mod dto;
pub mod ports;
pub mod services;

pub use dto::*;
pub use ports::*;
pub use services::*;
