//! Transport-agnostic dashboard types.

mod activity;
mod frame;
mod host;
mod series;

pub use activity::{GaugeSet, GaugeSnapshot};
pub use frame::Frame;
pub use host::{HostSnapshot, Usage};
pub use series::{ActivityPoint, HostTag, LatestQuery, Series};
