//! Pre-trade limits and commission.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::risk_management::ValidationPolicy;

/// Pre-trade limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum notional per order in dollars.
    #[serde(default = "default_max_order_value")]
    pub max_order_value: Decimal,
    /// Commission per option contract in dollars.
    #[serde(default = "default_commission_per_contract")]
    pub commission_per_contract: Decimal,
    /// Maximum strike width for spreads.
    #[serde(default = "default_max_spread_width")]
    pub max_spread_width: Decimal,
    /// Reject submissions on weekends.
    #[serde(default = "default_market_hours_only")]
    pub market_hours_only: bool,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_order_value: default_max_order_value(),
            commission_per_contract: default_commission_per_contract(),
            max_spread_width: default_max_spread_width(),
            market_hours_only: default_market_hours_only(),
        }
    }
}

impl LimitsConfig {
    /// Convert to the validator policy.
    #[must_use]
    pub const fn to_validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            max_order_value: self.max_order_value,
            max_spread_width: self.max_spread_width,
            market_hours_only: self.market_hours_only,
        }
    }
}

fn default_max_order_value() -> Decimal {
    dec!(50000)
}

fn default_commission_per_contract() -> Decimal {
    dec!(0.65)
}

fn default_max_spread_width() -> Decimal {
    dec!(20)
}

const fn default_market_hours_only() -> bool {
    true
}
