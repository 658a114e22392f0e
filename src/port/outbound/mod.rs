//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: the remote
//! time-series store, the local OS metrics, and frame output.

pub mod display;
pub mod host;
pub mod timeseries;
