//! The metrics store: owned connection state, gauges, and background tasks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{info, info_span, Instrument};

use super::state::ConnectionState;
use super::{connector, poller};
use crate::domain::{GaugeSet, GaugeSnapshot, HostTag};
use crate::error::StoreError;
use crate::infrastructure::config::influx::ConnectionConfig;
use crate::infrastructure::config::reconnect::ReconnectionConfig;
use crate::port::{ActivitySource, SessionFactory};

/// Last published gauges and when they were published.
#[derive(Debug, Clone, Copy, Default)]
struct Published {
    gauges: GaugeSet,
    at: Option<DateTime<Utc>>,
}

/// State shared by the store handle and its two background tasks.
pub(crate) struct Shared<F: SessionFactory> {
    pub(crate) factory: F,
    pub(crate) connection: ConnectionConfig,
    pub(crate) reconnection: ReconnectionConfig,
    pub(crate) host: HostTag,
    pub(crate) state: watch::Sender<ConnectionState<F::Session>>,
    published: RwLock<Published>,
    pub(crate) reconnect: Notify,
    shutdown: watch::Sender<bool>,
    /// Stops the connector only. Set on shutdown and when the poller gives up.
    halt: watch::Sender<bool>,
}

impl<F: SessionFactory> Shared<F> {
    pub(crate) fn current_state(&self) -> ConnectionState<F::Session> {
        self.state.borrow().clone()
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.state.borrow().is_connected()
    }

    pub(crate) fn gauges(&self) -> GaugeSet {
        self.published.read().gauges
    }

    /// Replace all three gauges in one write.
    pub(crate) fn publish(&self, gauges: GaugeSet) {
        *self.published.write() = Published {
            gauges,
            at: Some(Utc::now()),
        };
    }

    /// Record that `session` is dead: disconnect, zero the gauges, wake the connector.
    ///
    /// A session the connector has already replaced is left alone.
    pub(crate) fn mark_lost(&self, session: &Arc<F::Session>) {
        let mut published = self.published.write();
        let changed = self.state.send_if_modified(|state| {
            if state.holds(session) {
                *state = ConnectionState::Disconnected;
                true
            } else {
                false
            }
        });
        if changed {
            *published = Published::default();
            drop(published);
            self.reconnect.notify_one();
        }
    }

    /// Gauges and connection status read under one lock, so a reader never
    /// sees `Disconnected` next to the gauges of a lost session.
    pub(crate) fn snapshot(&self) -> GaugeSnapshot {
        let published = self.published.read();
        GaugeSnapshot {
            gauges: published.gauges,
            connected: self.is_connected(),
            published_at: published.at,
        }
    }

    /// Run a store call under the configured request timeout.
    pub(crate) async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        let limit = self.connection.timeout();
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(format!(
                "no response within {}s",
                limit.as_secs_f64()
            ))),
        }
    }

    pub(crate) fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    pub(crate) fn request_shutdown(&self) {
        self.shutdown.send_replace(true);
        self.halt_connector();
    }

    pub(crate) fn halt_receiver(&self) -> watch::Receiver<bool> {
        self.halt.subscribe()
    }

    /// Stop reconnecting without shutting the store down.
    pub(crate) fn halt_connector(&self) {
        self.halt.send_replace(true);
    }
}

/// Sleep for `delay` unless shutdown is requested first.
///
/// Returns `false` when shutdown won.
pub(crate) async fn sleep_or_shutdown(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(delay) => true,
        _ = shutdown.wait_for(|stop| *stop) => false,
    }
}

struct Tasks {
    connector: JoinHandle<()>,
    poller: JoinHandle<()>,
}

/// Resilient client for the three remote health gauges.
///
/// [`start`](Self::start) launches two long-lived tasks: the connector, which
/// (re)establishes the session with backoff, and the poller, which refreshes
/// the gauges every poll interval. Readers call the getters at any time
/// without blocking either task.
pub struct MetricsStore<F: SessionFactory> {
    shared: Arc<Shared<F>>,
    tasks: Mutex<Option<Tasks>>,
}

impl<F: SessionFactory> MetricsStore<F> {
    /// Create a store for the local host. Nothing runs until [`start`](Self::start).
    pub fn new(factory: F, connection: ConnectionConfig, reconnection: ReconnectionConfig) -> Self {
        let host = HostTag::new(connection.resolve_host_tag());
        Self::with_host(factory, connection, reconnection, host)
    }

    /// Create a store that queries the series of an explicit host.
    pub fn with_host(
        factory: F,
        connection: ConnectionConfig,
        reconnection: ReconnectionConfig,
        host: HostTag,
    ) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let (shutdown, _) = watch::channel(false);
        let (halt, _) = watch::channel(false);
        let shared = Shared {
            factory,
            connection,
            reconnection,
            host,
            state,
            published: RwLock::new(Published::default()),
            reconnect: Notify::new(),
            shutdown,
            halt,
        };
        Self {
            shared: Arc::new(shared),
            tasks: Mutex::new(None),
        }
    }

    /// Launch the connector and poller tasks. Must be called inside a Tokio runtime.
    ///
    /// Returns `false` if the tasks were already launched.
    pub fn start(&self) -> bool {
        let mut tasks = self.tasks.lock();
        if tasks.is_some() {
            return false;
        }

        info!(
            endpoint = %self.shared.factory.endpoint(),
            host = %self.shared.host,
            "Starting metrics store"
        );

        let connector = tokio::spawn(
            connector::run(Arc::clone(&self.shared))
                .instrument(info_span!("influx_connector")),
        );
        let poller = tokio::spawn(
            poller::run(Arc::clone(&self.shared)).instrument(info_span!("influx_poller")),
        );
        *tasks = Some(Tasks { connector, poller });
        true
    }

    /// Establish a session in the foreground, retrying with backoff.
    ///
    /// No-op while already connected. Must not run concurrently with the
    /// background connector.
    pub async fn connect(&self) {
        let mut halt = self.shared.halt_receiver();
        connector::connect(&self.shared, &mut halt).await;
    }

    /// Run one poll round against the current session.
    ///
    /// On success the staged values are published; on failure the connection
    /// is marked lost and the gauges reset to 0.
    ///
    /// # Errors
    ///
    /// Returns the store failure, or `Unreachable` when there is no session.
    pub async fn poll_once(&self) -> Result<GaugeSet, StoreError> {
        match self.shared.current_state().session() {
            Some(session) => poller::poll_round(&self.shared, &session).await,
            None => Err(StoreError::Unreachable("not connected".into())),
        }
    }

    pub fn execution_activity(&self) -> u8 {
        self.shared.gauges().execution
    }

    pub fn node_activity(&self) -> u8 {
        self.shared.gauges().node
    }

    pub fn consensus_activity(&self) -> u8 {
        self.shared.gauges().consensus
    }

    /// All three gauges from the same round.
    pub fn gauges(&self) -> GaugeSet {
        self.shared.gauges()
    }

    pub fn snapshot(&self) -> GaugeSnapshot {
        self.shared.snapshot()
    }

    pub fn state(&self) -> ConnectionState<F::Session> {
        self.shared.current_state()
    }

    pub fn is_connected(&self) -> bool {
        self.shared.is_connected()
    }

    pub fn host(&self) -> &HostTag {
        &self.shared.host
    }

    /// Ask both background tasks to stop at their next wait.
    pub fn shutdown(&self) {
        self.shared.request_shutdown();
    }

    /// True once [`shutdown`](Self::shutdown) was called or the store dropped.
    ///
    /// The poller giving up does not count: the store stays readable and
    /// reports 0 for every gauge.
    pub fn is_shut_down(&self) -> bool {
        *self.shared.shutdown.borrow()
    }

    /// Receiver that flips to `true` when shutdown is requested.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shared.shutdown_receiver()
    }

    /// True while the background tasks have been launched and the poller is alive.
    pub fn is_polling(&self) -> bool {
        self.tasks
            .lock()
            .as_ref()
            .is_some_and(|tasks| !tasks.poller.is_finished())
    }

    /// Wait for both background tasks to finish. Call after [`shutdown`](Self::shutdown).
    pub async fn join(&self) {
        let tasks = self.tasks.lock().take();
        if let Some(Tasks { connector, poller }) = tasks {
            let _ = connector.await;
            let _ = poller.await;
        }
    }
}

impl<F: SessionFactory> ActivitySource for MetricsStore<F> {
    fn execution_activity(&self) -> u8 {
        MetricsStore::execution_activity(self)
    }

    fn node_activity(&self) -> u8 {
        MetricsStore::node_activity(self)
    }

    fn consensus_activity(&self) -> u8 {
        MetricsStore::consensus_activity(self)
    }

    fn snapshot(&self) -> GaugeSnapshot {
        MetricsStore::snapshot(self)
    }
}

impl<F: SessionFactory> Drop for MetricsStore<F> {
    fn drop(&mut self) {
        self.shared.request_shutdown();
    }
}
