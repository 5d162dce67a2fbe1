//! Order Validator
//!
//! Pure pre-trade checks run before an order is handed to a gateway.

use chrono::{DateTime, Datelike, Utc, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::order_execution::MultiLegOrder;
use crate::domain::risk_management::errors::ValidationError;

/// Limits applied by [`OrderValidator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Maximum notional per order (`|net| × quantity × 100`).
    pub max_order_value: Decimal,
    /// Maximum strike width for spread strategies.
    pub max_spread_width: Decimal,
    /// Reject submissions on weekends.
    pub market_hours_only: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_order_value: dec!(50000),
            max_spread_width: dec!(20),
            market_hours_only: true,
        }
    }
}

/// Validates orders against a [`ValidationPolicy`].
///
/// Checks run in order and stop at the first failure:
/// notional, then spread width, then market days.
#[derive(Debug, Clone, Default)]
pub struct OrderValidator {
    policy: ValidationPolicy,
}

impl OrderValidator {
    /// Create a validator with the given policy.
    #[must_use]
    pub const fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    /// Get the policy.
    #[must_use]
    pub const fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validate an order as of `now`.
    ///
    /// # Errors
    ///
    /// Returns the first check that fails.
    pub fn validate(
        &self,
        order: &MultiLegOrder,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        self.check_order_value(order)?;
        self.check_spread_width(order)?;
        self.check_market_day(now)
    }

    fn check_order_value(&self, order: &MultiLegOrder) -> Result<(), ValidationError> {
        let value = order.notional();
        if value > self.policy.max_order_value {
            return Err(ValidationError::OrderValueExceeded {
                value,
                limit: self.policy.max_order_value,
            });
        }
        Ok(())
    }

    fn check_spread_width(&self, order: &MultiLegOrder) -> Result<(), ValidationError> {
        if !order.strategy_type().is_spread() {
            return Ok(());
        }

        let (min, max, count) = order.strikes().fold(
            (Decimal::MAX, Decimal::MIN, 0usize),
            |(min, max, count), strike| (min.min(strike), max.max(strike), count + 1),
        );
        // Width is only defined once two strikes are present.
        if count < 2 {
            return Ok(());
        }

        let width = max - min;
        if width > self.policy.max_spread_width {
            return Err(ValidationError::SpreadTooWide {
                width,
                limit: self.policy.max_spread_width,
            });
        }
        Ok(())
    }

    fn check_market_day(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if !self.policy.market_hours_only {
            return Ok(());
        }
        let day = now.weekday();
        if matches!(day, Weekday::Sat | Weekday::Sun) {
            return Err(ValidationError::MarketClosed { day });
        }
        Ok(())
    }
}
