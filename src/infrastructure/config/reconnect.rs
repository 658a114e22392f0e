//! Reconnection backoff and give-up configuration.

use std::time::Duration;

use serde::Deserialize;

/// How the delay between reconnection attempts grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffPolicy {
    /// Always wait the base retry interval.
    Fixed,
    /// Multiply the delay after every failed attempt, up to the cap.
    #[default]
    Exponential,
}

/// When the poller stops waiting for a lost connection to come back.
///
/// Exactly one policy is active. In TOML: `give_up = "never"`,
/// `give_up = { attempts = 60 }` or `give_up = { window_secs = 600 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiveUpPolicy {
    /// Keep waiting for the lifetime of the process.
    #[default]
    Never,
    /// Give up after this many consecutive reconnect waits.
    Attempts(u32),
    /// Give up once the outage has lasted this long (seconds).
    WindowSecs(u64),
}

impl GiveUpPolicy {
    /// True once an outage of `attempts` waits lasting `elapsed` exceeds the policy.
    pub fn is_exhausted(&self, attempts: u32, elapsed: Duration) -> bool {
        match *self {
            Self::Never => false,
            Self::Attempts(max) => attempts >= max,
            Self::WindowSecs(secs) => elapsed >= Duration::from_secs(secs),
        }
    }

    /// Time left in the outage window, for window-based policies.
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        match *self {
            Self::WindowSecs(secs) => Some(Duration::from_secs(secs).saturating_sub(elapsed)),
            Self::Never | Self::Attempts(_) => None,
        }
    }
}

/// Reconnection configuration for the time-series connection.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectionConfig {
    /// Delay growth policy.
    #[serde(default)]
    pub backoff: BackoffPolicy,
    /// Multiplier applied to the delay after each failed attempt.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Maximum delay between attempts (seconds).
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
    /// Give-up policy for a lost connection.
    #[serde(default)]
    pub give_up: GiveUpPolicy,
}

fn default_backoff_multiplier() -> f64 {
    1.5
}

const fn default_max_delay_secs() -> u64 {
    300 // 5 minutes
}

impl ReconnectionConfig {
    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }
}

impl Default for ReconnectionConfig {
    fn default() -> Self {
        Self {
            backoff: BackoffPolicy::default(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_secs: default_max_delay_secs(),
            give_up: GiveUpPolicy::default(),
        }
    }
}
