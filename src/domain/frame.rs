//! One rendered dashboard frame.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::activity::GaugeSnapshot;
use super::host::HostSnapshot;

/// Everything the display shows for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub hostname: String,
    pub tick: u64,
    pub captured_at: DateTime<Utc>,
    pub host: HostSnapshot,
    pub activity: GaugeSnapshot,
}
