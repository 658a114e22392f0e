//! Health series in the time-series store and the point-lookup queries against them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the three remote health series, in polling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Series {
    Execution,
    Node,
    Consensus,
}

impl Series {
    /// All series in the fixed per-round query order.
    pub const ALL: [Series; 3] = [Series::Execution, Series::Node, Series::Consensus];

    /// Measurement name in the store.
    #[must_use]
    pub const fn measurement(self) -> &'static str {
        match self {
            Self::Execution => "status_exec",
            Self::Node => "status_node",
            Self::Consensus => "status_consensus",
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.measurement())
    }
}

/// Host identifier used to select a machine's points in every series.
///
/// The store tags points with `<hostname>_s`; this holds the bare hostname.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostTag(String);

impl HostTag {
    /// Suffix the reporting agent appends to the hostname.
    pub const SUFFIX: &'static str = "_s";

    pub fn new(host: impl Into<String>) -> Self {
        Self(host.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full tag value as stored, e.g. `eop-1_s`.
    #[must_use]
    pub fn tag_value(&self) -> String {
        format!("{}{}", self.0, Self::SUFFIX)
    }
}

impl fmt::Display for HostTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HostTag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for HostTag {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Request for the single most recent point of a series for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestQuery {
    pub series: Series,
    pub host: HostTag,
}

impl LatestQuery {
    pub fn new(series: Series, host: HostTag) -> Self {
        Self { series, host }
    }
}

/// One `active_percent` reading returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityPoint {
    /// Point timestamp, when the store reported a parseable one.
    pub time: Option<DateTime<Utc>>,
    /// Raw field value.
    pub active_percent: f64,
}

impl ActivityPoint {
    pub fn new(active_percent: f64) -> Self {
        Self {
            time: None,
            active_percent,
        }
    }

    /// Value as an integer percentage: rounded, clamped into `0..=100`.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if !self.active_percent.is_finite() {
            return 0;
        }
        self.active_percent.round().clamp(0.0, 100.0) as u8
    }
}
