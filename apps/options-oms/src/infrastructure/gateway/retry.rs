//! Backoff while the fill worker pool is full.
//!
//! A submitted order that finds no free worker waits and tries again. The
//! wait for attempt `n` is `initial * multiplier^n`, capped, then spread by
//! the jitter factor so queued orders do not wake in lockstep. Once
//! `max_attempts` waits are used up the order is rejected by the venue.

use std::time::Duration;

use rand::Rng;

/// How long a fill waits for a free worker.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingRetryPolicy {
    /// Waits allowed before giving up.
    pub max_attempts: u32,
    /// Wait before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound on any single wait.
    pub max_backoff: Duration,
    /// Growth per attempt.
    pub backoff_multiplier: f64,
    /// Fraction of the wait randomized either way.
    pub jitter_factor: f64,
}

impl Default for SchedulingRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }
}

impl SchedulingRetryPolicy {
    /// Build a policy from explicit values.
    #[must_use]
    pub const fn new(
        max_attempts: u32,
        initial_backoff: Duration,
        max_backoff: Duration,
        backoff_multiplier: f64,
        jitter_factor: f64,
    ) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            max_backoff,
            backoff_multiplier,
            jitter_factor,
        }
    }

    /// Reject as soon as the pool is full.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO, 1.0, 0.0)
    }

    /// Wait before retry number `attempt` (zero-based), or `None` once the
    /// attempts are spent.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }

        let cap = self.max_backoff.as_secs_f64();
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let scaled = (self.initial_backoff.as_secs_f64()
            * self.backoff_multiplier.powi(exponent))
        .min(cap);

        let spread = scaled * self.jitter_factor;
        let secs = if spread > 0.0 {
            rand::rng().random_range((scaled - spread).max(0.0)..=scaled + spread)
        } else {
            scaled
        };
        Some(Duration::from_secs_f64(secs.min(cap)))
    }
}
