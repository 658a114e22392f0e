//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`session`] - Scripted [`SessionFactory`](crate::port::SessionFactory)
//!   and [`SeriesSession`](crate::port::SeriesSession) doubles.
//! - [`host`] - Fixed host metrics, fixed activity, and recording sinks.
//! - [`config`] - Canonical test configurations.

pub mod config;
pub mod host;
pub mod session;
