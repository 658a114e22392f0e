//! Local host metrics shown on the dashboard.

use std::net::IpAddr;

use serde::Serialize;

/// Used/total pair in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub used: u64,
    pub total: u64,
}

impl Usage {
    pub const fn new(used: u64, total: u64) -> Self {
        Self { used, total }
    }

    /// Used share in percent, 0 when the total is unknown.
    #[must_use]
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        ((self.used as f64 / self.total as f64) * 100.0) as f32
    }
}

/// Last sampled local metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HostSnapshot {
    pub cpu_percent: f32,
    /// CPU temperature in °C, 0 when no sensor is available.
    pub cpu_temp_c: f32,
    pub memory: Usage,
    pub swap: Usage,
    pub disk: Usage,
    pub ip_address: Option<IpAddr>,
}
