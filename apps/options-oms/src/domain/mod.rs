//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Aggregates**: Consistency boundaries with invariants
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Services**: Stateless business logic
//!
//! # Bounded Contexts
//!
//! - [`contract`]: Option contract specification
//! - [`order_execution`]: Multi-leg order lifecycle
//! - [`risk_management`]: Pre-trade validation

pub mod contract;
pub mod order_execution;
pub mod risk_management;
pub mod shared;
