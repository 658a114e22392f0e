//! Local host metrics port.

use std::net::IpAddr;

use crate::domain::Usage;

/// Source of local OS metrics. Each call refreshes the reading it returns.
pub trait HostMetricsSource: Send {
    fn cpu_percent(&mut self) -> f32;

    /// CPU temperature in °C, 0 when unavailable.
    fn cpu_temperature(&mut self) -> f32;

    fn memory(&mut self) -> Usage;

    fn swap(&mut self) -> Usage;

    fn disk(&mut self) -> Usage;

    fn ip_address(&mut self) -> Option<IpAddr>;
}
