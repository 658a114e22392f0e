//! Reconnection delay schedule.

use std::time::Duration;

use crate::infrastructure::config::reconnect::{BackoffPolicy, ReconnectionConfig};

/// Attempts beyond this no longer change an exponential delay.
const MAX_EXPONENT: u32 = 1_000;

/// Delay schedule for consecutive reconnection attempts.
///
/// Attempt `k` (starting at 0) waits `min(max_delay, base × multiplier^k)`
/// under the exponential policy, or `base` under the fixed policy.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: BackoffPolicy,
    base: Duration,
    multiplier: f64,
    max: Duration,
    attempt: u32,
}

impl Backoff {
    pub fn new(base: Duration, config: &ReconnectionConfig) -> Self {
        Self {
            policy: config.backoff,
            base,
            multiplier: config.backoff_multiplier,
            max: config.max_delay(),
            attempt: 0,
        }
    }

    /// Delay for the given zero-based attempt, without advancing.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self.policy {
            BackoffPolicy::Fixed => self.base,
            BackoffPolicy::Exponential => {
                let exponent = attempt.min(MAX_EXPONENT) as i32;
                let secs = self.base.as_secs_f64() * self.multiplier.powi(exponent);
                Duration::from_secs_f64(secs.min(self.max.as_secs_f64()))
            }
        }
    }

    /// Return the current delay and advance to the next attempt.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.delay_for(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        delay
    }

    /// Number of delays handed out since the last reset.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}
