//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests. Durations are
//! in whole seconds; tests run them under Tokio's paused clock.

use crate::domain::HostTag;
use crate::infrastructure::config::influx::ConnectionConfig;
use crate::infrastructure::config::reconnect::{BackoffPolicy, GiveUpPolicy, ReconnectionConfig};

/// Host identifier used by scripted stores.
pub fn host() -> HostTag {
    HostTag::new("eop-1")
}

/// Connection settings matching the deployed defaults: 5 s timeout, 10 s
/// retry interval, 10 s poll interval, 3 s startup grace, 3 s failure pause.
pub fn connection() -> ConnectionConfig {
    ConnectionConfig {
        host_tag: Some(host().as_str().to_string()),
        ..ConnectionConfig::default()
    }
}

/// Fixed-interval reconnection with no give-up cap.
pub fn fixed_reconnection() -> ReconnectionConfig {
    ReconnectionConfig {
        backoff: BackoffPolicy::Fixed,
        ..ReconnectionConfig::default()
    }
}

/// Exponential reconnection (×1.5, capped at 300 s) with no give-up cap.
pub fn exponential_reconnection() -> ReconnectionConfig {
    ReconnectionConfig::default()
}

/// Fixed-interval reconnection that gives up under `policy`.
pub fn capped_reconnection(policy: GiveUpPolicy) -> ReconnectionConfig {
    ReconnectionConfig {
        give_up: policy,
        ..fixed_reconnection()
    }
}
