//! Outbound adapters: the InfluxDB client, host metrics, and frame sinks.

pub mod display;
pub mod host;
pub mod influx;
