//! Read side of the published health gauges.

use crate::domain::GaugeSnapshot;

/// Non-blocking access to the latest activity percentages.
///
/// Every getter returns the last published value; 0 while disconnected.
pub trait ActivitySource: Send + Sync {
    fn execution_activity(&self) -> u8;

    fn node_activity(&self) -> u8;

    fn consensus_activity(&self) -> u8;

    /// All three gauges plus connection status, read together.
    fn snapshot(&self) -> GaugeSnapshot;
}
