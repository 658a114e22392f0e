//! hwmonitor - single-board-computer status dashboard.
//!
//! Samples local host metrics on a tiered cadence and keeps three activity
//! gauges (execution client, node, consensus client) fresh from an InfluxDB
//! server, surviving outages of that server without ever blocking readers.
//!
//! # Modules
//!
//! - [`domain`] - Gauges, series, host snapshots and display frames
//! - [`port`] - Traits at the edges: store sessions, host metrics, sinks
//! - [`application`] - The metrics store (connector + poller) and display loop
//! - [`adapter`] - InfluxDB HTTP session, sysinfo host source, frame sinks
//! - [`infrastructure`] - Configuration and runtime wiring
//! - [`cli`] - Command-line entry points
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use hwmonitor::infrastructure::bootstrap;
//! use hwmonitor::infrastructure::config::settings::Config;
//!
//! # async fn demo() -> hwmonitor::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let store = bootstrap::build_metrics_store(&config)?;
//! store.start();
//! println!("execution at {}%", store.execution_activity());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
