//! Inbound (driving) ports consumed by inbound adapters.
//!
//! - [`activity`]: read access to the health gauges for the display loop and CLI

pub mod activity;
