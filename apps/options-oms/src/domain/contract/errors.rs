//! Contract construction errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while building an option contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// Strike must be strictly positive.
    #[error("Invalid strike {strike}: must be greater than zero")]
    NonPositiveStrike {
        /// Rejected strike.
        strike: Decimal,
    },

    /// Expiration could not be parsed as `YYYY-MM-DD`.
    #[error("Invalid expiration '{value}': expected YYYY-MM-DD")]
    InvalidExpiration {
        /// Raw input.
        value: String,
    },

    /// Underlying symbol was empty.
    #[error("Underlying symbol must not be empty")]
    EmptyUnderlying,

    /// Multiplier must be strictly positive.
    #[error("Contract multiplier must be greater than zero")]
    ZeroMultiplier,
}
