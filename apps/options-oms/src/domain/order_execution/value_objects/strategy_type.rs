//! Strategy that produced a multi-leg order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy classification of a multi-leg order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyType {
    /// Long lower-strike call, short higher-strike call.
    BullCallSpread,
    /// Closing order for a bull call spread.
    BullCallSpreadExit,
}

impl StrategyType {
    /// Returns true if the spread-width limit applies to this strategy.
    #[must_use]
    pub const fn is_spread(&self) -> bool {
        matches!(self, Self::BullCallSpread | Self::BullCallSpreadExit)
    }

    /// Prefix used when generating order ids.
    #[must_use]
    pub const fn id_prefix(&self) -> &'static str {
        match self {
            Self::BullCallSpread => "BCS",
            Self::BullCallSpreadExit => "BCS_EXIT",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BullCallSpread => write!(f, "BULL_CALL_SPREAD"),
            Self::BullCallSpreadExit => write!(f, "BULL_CALL_SPREAD_EXIT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spreads_are_width_checked() {
        assert!(StrategyType::BullCallSpread.is_spread());
        assert!(StrategyType::BullCallSpreadExit.is_spread());
    }

    #[test]
    fn strategy_type_serde() {
        let json = serde_json::to_string(&StrategyType::BullCallSpreadExit).unwrap();
        assert_eq!(json, "\"BULL_CALL_SPREAD_EXIT\"");
        let parsed: StrategyType = serde_json::from_str("\"BULL_CALL_SPREAD\"").unwrap();
        assert_eq!(parsed, StrategyType::BullCallSpread);
    }
}
