//! Contract Bounded Context
//!
//! Immutable option contract specifications and their canonical symbols.

pub mod errors;
pub mod option_contract;

pub use errors::ContractError;
pub use option_contract::{OptionContract, OptionRight, parse_expiration};
