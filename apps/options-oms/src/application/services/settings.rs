//! Runtime settings for the order management system.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::domain::risk_management::ValidationPolicy;

/// What the stale-order sweep does with SUBMITTED orders that outlived the
/// grace period without an execution report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaleOrderPolicy {
    /// Alert once per order and leave it alone.
    #[default]
    Manual,
    /// Move the order to EXPIRED.
    Expire,
    /// Cancel at the gateway, then move the order to CANCELLED.
    Cancel,
}

/// Settings the OMS runs with.
#[derive(Debug, Clone)]
pub struct OmsSettings {
    /// Commission charged per contract.
    pub commission_per_contract: Decimal,
    /// Pre-trade validation policy.
    pub validation: ValidationPolicy,
    /// Stale SUBMITTED order handling.
    pub stale_order_policy: StaleOrderPolicy,
    /// How long a SUBMITTED order may wait for a report.
    pub submitted_grace_period: Duration,
    /// Interval between stale-order sweeps.
    pub sweep_interval: Duration,
}

impl Default for OmsSettings {
    fn default() -> Self {
        Self {
            commission_per_contract: dec!(0.65),
            validation: ValidationPolicy::default(),
            stale_order_policy: StaleOrderPolicy::Manual,
            submitted_grace_period: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(30),
        }
    }
}

impl OmsSettings {
    /// Check settings that the YAML path validates but direct callers can
    /// still get wrong.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a zero sweep interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "sweep_interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_policy_serde_uses_screaming_names() {
        let json = serde_json::to_string(&StaleOrderPolicy::Expire).unwrap();
        assert_eq!(json, "\"EXPIRE\"");
        let parsed: StaleOrderPolicy = serde_json::from_str("\"CANCEL\"").unwrap();
        assert_eq!(parsed, StaleOrderPolicy::Cancel);
    }

    #[test]
    fn defaults_match_config_defaults() {
        let settings = OmsSettings::default();
        assert_eq!(settings.commission_per_contract, dec!(0.65));
        assert_eq!(settings.stale_order_policy, StaleOrderPolicy::Manual);
        assert_eq!(settings.sweep_interval, Duration::from_secs(30));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn zero_sweep_interval_is_invalid() {
        let settings = OmsSettings {
            sweep_interval: Duration::ZERO,
            ..OmsSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
