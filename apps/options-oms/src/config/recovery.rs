//! Recovery configuration for orders stuck in SUBMITTED.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::services::StaleOrderPolicy;

/// Recovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// What to do with SUBMITTED orders past the grace period.
    #[serde(default)]
    pub stale_order_policy: StaleOrderPolicy,
    /// Seconds a SUBMITTED order may wait for a report.
    #[serde(default = "default_grace_period_secs")]
    pub submitted_grace_period_secs: u64,
    /// Seconds between stale-order sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            stale_order_policy: StaleOrderPolicy::default(),
            submitted_grace_period_secs: default_grace_period_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl RecoveryConfig {
    /// Grace period as a duration.
    #[must_use]
    pub const fn grace_period(&self) -> Duration {
        Duration::from_secs(self.submitted_grace_period_secs)
    }

    /// Sweep interval as a duration.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

const fn default_grace_period_secs() -> u64 {
    300
}

const fn default_sweep_interval_secs() -> u64 {
    30
}
