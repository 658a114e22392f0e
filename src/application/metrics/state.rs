//! Connection state shared between the connector and the poller.

use std::fmt;
use std::sync::Arc;

/// Whether a live session with the store exists.
///
/// Only the connector moves `Disconnected → Connected`; only the poller moves
/// `Connected → Disconnected`.
pub enum ConnectionState<S> {
    Disconnected,
    Connected(Arc<S>),
}

impl<S> ConnectionState<S> {
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    /// The live session, if any.
    #[must_use]
    pub fn session(&self) -> Option<Arc<S>> {
        match self {
            Self::Connected(session) => Some(Arc::clone(session)),
            Self::Disconnected => None,
        }
    }

    /// True when connected through exactly this session.
    pub(crate) fn holds(&self, session: &Arc<S>) -> bool {
        match self {
            Self::Connected(current) => Arc::ptr_eq(current, session),
            Self::Disconnected => false,
        }
    }
}

impl<S> Clone for ConnectionState<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Disconnected => Self::Disconnected,
            Self::Connected(session) => Self::Connected(Arc::clone(session)),
        }
    }
}

impl<S> fmt::Debug for ConnectionState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("Disconnected"),
            Self::Connected(_) => f.write_str("Connected"),
        }
    }
}
