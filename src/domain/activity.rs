//! Published health gauges.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::series::Series;

/// The three activity percentages, always published together.
///
/// Zero doubles as "unknown": every gauge is reset to 0 while the store is
/// unreachable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GaugeSet {
    pub execution: u8,
    pub node: u8,
    pub consensus: u8,
}

impl GaugeSet {
    pub const ZERO: GaugeSet = GaugeSet {
        execution: 0,
        node: 0,
        consensus: 0,
    };

    #[must_use]
    pub const fn get(&self, series: Series) -> u8 {
        match series {
            Series::Execution => self.execution,
            Series::Node => self.node,
            Series::Consensus => self.consensus,
        }
    }

    pub fn set(&mut self, series: Series, value: u8) {
        match series {
            Series::Execution => self.execution = value,
            Series::Node => self.node = value,
            Series::Consensus => self.consensus = value,
        }
    }
}

/// Gauges together with the connection status they were read under.
///
/// Lets a consumer tell "disconnected" apart from "observed 0".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GaugeSnapshot {
    pub gauges: GaugeSet,
    pub connected: bool,
    /// When the gauges were last published by a successful round.
    pub published_at: Option<DateTime<Utc>>,
}

impl Default for GaugeSnapshot {
    fn default() -> Self {
        Self {
            gauges: GaugeSet::ZERO,
            connected: false,
            published_at: None,
        }
    }
}
