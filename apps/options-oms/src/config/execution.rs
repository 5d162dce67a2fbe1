//! Order execution configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::infrastructure::gateway::{PaperGatewayConfig, SchedulingRetryPolicy};

/// Order execution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Route orders to the paper fill simulator instead of a live broker.
    #[serde(default = "default_paper_trading")]
    pub paper_trading: bool,
    /// Delay before a paper order fills, in milliseconds.
    #[serde(default = "default_fill_delay_ms")]
    pub fill_delay_ms: u64,
    /// Probability in `[0, 1]` that a paper submission is rejected.
    #[serde(default = "default_rejection_rate")]
    pub rejection_rate: f64,
    /// Maximum concurrent fill tasks.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Accepted for compatibility; partial fills are not simulated.
    #[serde(default)]
    pub enable_partial_fills: bool,
    /// Backoff for fill scheduling while the worker pool is full.
    #[serde(default)]
    pub scheduling_retry: SchedulingRetryConfig,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            paper_trading: default_paper_trading(),
            fill_delay_ms: default_fill_delay_ms(),
            rejection_rate: default_rejection_rate(),
            max_workers: default_max_workers(),
            enable_partial_fills: false,
            scheduling_retry: SchedulingRetryConfig::default(),
        }
    }
}

impl ExecutionConfig {
    /// Get the fill delay as a duration.
    #[must_use]
    pub const fn fill_delay(&self) -> Duration {
        Duration::from_millis(self.fill_delay_ms)
    }

    /// Convert to the paper gateway configuration.
    #[must_use]
    pub fn to_paper_gateway_config(&self) -> PaperGatewayConfig {
        PaperGatewayConfig {
            fill_delay: self.fill_delay(),
            rejection_rate: self.rejection_rate,
            max_workers: self.max_workers,
            retry: self.scheduling_retry.to_policy(),
        }
    }
}

/// Backoff settings for fill scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingRetryConfig {
    /// Maximum retry attempts before the order is rejected.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Initial backoff in milliseconds.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Backoff cap in milliseconds.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Exponential growth factor.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Jitter as a fraction of the backoff (0.2 = ±20%).
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

impl Default for SchedulingRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter_factor: default_jitter_factor(),
        }
    }
}

impl SchedulingRetryConfig {
    /// Convert to the runtime retry policy.
    #[must_use]
    pub const fn to_policy(&self) -> SchedulingRetryPolicy {
        SchedulingRetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
            self.backoff_multiplier,
            self.jitter_factor,
        )
    }
}

const fn default_paper_trading() -> bool {
    true
}

const fn default_fill_delay_ms() -> u64 {
    5000
}

const fn default_rejection_rate() -> f64 {
    0.02
}

const fn default_max_workers() -> usize {
    4
}

const fn default_max_attempts() -> u32 {
    10
}

const fn default_initial_backoff_ms() -> u64 {
    100
}

const fn default_max_backoff_ms() -> u64 {
    5000
}

const fn default_backoff_multiplier() -> f64 {
    2.0
}

const fn default_jitter_factor() -> f64 {
    0.2
}
