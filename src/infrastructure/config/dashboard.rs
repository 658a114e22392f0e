//! Display loop settings.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Settings for the headless display loop.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Tick period (milliseconds).
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    /// Memory and swap are sampled every this many ticks.
    #[serde(default = "default_medium_every")]
    pub medium_every: u64,
    /// Disk and network address are sampled every this many ticks.
    #[serde(default = "default_slow_every")]
    pub slow_every: u64,
    /// Path whose filesystem is reported as disk usage.
    #[serde(default = "default_disk_path")]
    pub disk_path: PathBuf,
    /// Interfaces searched for the local address, in priority order.
    #[serde(default = "default_interfaces")]
    pub interfaces: Vec<String>,
    /// When set, every frame is also written as JSON to this file.
    #[serde(default)]
    pub status_file: Option<PathBuf>,
}

const fn default_refresh_interval_ms() -> u64 {
    1000
}

const fn default_medium_every() -> u64 {
    10
}

const fn default_slow_every() -> u64 {
    30
}

fn default_disk_path() -> PathBuf {
    PathBuf::from("/home")
}

fn default_interfaces() -> Vec<String> {
    vec!["eth0".into(), "wlan0".into()]
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            medium_every: default_medium_every(),
            slow_every: default_slow_every(),
            disk_path: default_disk_path(),
            interfaces: default_interfaces(),
            status_file: None,
        }
    }
}
