//! Application services (use cases).
//!
//! - [`metrics`]: the resilient time-series polling client
//! - [`dashboard`]: the display loop that consumes it

pub mod dashboard;
pub mod metrics;
