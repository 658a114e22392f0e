//! Time-series store port.
//!
//! The metrics store drives these traits; the InfluxDB adapter and the
//! scripted test doubles implement them.

use async_trait::async_trait;

use crate::domain::{ActivityPoint, LatestQuery};
use crate::error::StoreError;

/// An open session with the store.
#[async_trait]
pub trait SeriesSession: Send + Sync {
    /// Explicit liveness probe. A session that fails it must be discarded.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Most recent point(s) matching the query, newest first.
    ///
    /// A series with no matching points yields `Ok` with an empty vector.
    async fn latest(&self, query: &LatestQuery) -> Result<Vec<ActivityPoint>, StoreError>;
}

/// Opens sessions against a configured store.
#[async_trait]
pub trait SessionFactory: Send + Sync + 'static {
    type Session: SeriesSession + 'static;

    /// Open a new session. Does not imply the session is live; see
    /// [`SeriesSession::ping`].
    async fn open(&self) -> Result<Self::Session, StoreError>;

    /// Human-readable endpoint for log lines.
    fn endpoint(&self) -> String;
}
