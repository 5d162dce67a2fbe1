//! Pre-trade validation errors.

use chrono::Weekday;
use rust_decimal::Decimal;
use thiserror::Error;

/// Reason an order failed pre-trade validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Notional value above the configured limit.
    #[error("Order value ${value} exceeds limit ${limit}")]
    OrderValueExceeded {
        /// Observed notional.
        value: Decimal,
        /// Configured limit.
        limit: Decimal,
    },

    /// Strike width above the configured limit.
    #[error("Spread width {width} exceeds limit {limit}")]
    SpreadTooWide {
        /// Observed strike width.
        width: Decimal,
        /// Configured limit.
        limit: Decimal,
    },

    /// Submitted outside market days.
    #[error("Market closed on {day}")]
    MarketClosed {
        /// Weekday of the attempted submission (UTC).
        day: Weekday,
    },
}

impl ValidationError {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::OrderValueExceeded { .. } => "ORDER_VALUE_EXCEEDED",
            Self::SpreadTooWide { .. } => "SPREAD_TOO_WIDE",
            Self::MarketClosed { .. } => "MARKET_CLOSED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn display_includes_observed_and_limit() {
        let err = ValidationError::SpreadTooWide {
            width: dec!(20),
            limit: dec!(10),
        };
        assert_eq!(err.to_string(), "Spread width 20 exceeds limit 10");
        assert_eq!(err.code(), "SPREAD_TOO_WIDE");
    }

    #[test]
    fn market_closed_names_day() {
        let err = ValidationError::MarketClosed { day: Weekday::Sat };
        assert_eq!(err.to_string(), "Market closed on Sat");
    }
}
