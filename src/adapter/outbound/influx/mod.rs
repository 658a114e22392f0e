//! InfluxDB 1.x adapter for the time-series port.

mod client;
pub mod query;

pub use client::{InfluxSession, InfluxSessionFactory};
