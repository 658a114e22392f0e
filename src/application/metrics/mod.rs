//! Resilient time-series polling client.
//!
//! [`MetricsStore`] owns the connection to the store, a connector task that
//! reconnects with [`Backoff`], and a poller task that publishes the three
//! activity gauges. See [`ConnectionState`] for who may write what.

mod backoff;
mod connector;
mod poller;
mod state;
mod store;

pub use backoff::Backoff;
pub use state::ConnectionState;
pub use store::MetricsStore;
