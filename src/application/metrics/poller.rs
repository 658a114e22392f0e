//! Poller task: refreshes the gauges while connected.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info};

use super::backoff::Backoff;
use super::state::ConnectionState;
use super::store::{sleep_or_shutdown, Shared};
use crate::domain::{GaugeSet, LatestQuery, Series};
use crate::error::{describe, StoreError};
use crate::port::{SeriesSession, SessionFactory};

/// How a wait for the connector ended.
enum Wake {
    Connected,
    TimedOut,
    Shutdown,
}

/// Current outage, counted from the first time the poller saw `Disconnected`.
struct Outage {
    started: Instant,
    waits: u32,
}

/// Poller task body.
pub(crate) async fn run<F: SessionFactory>(shared: Arc<Shared<F>>) {
    let mut shutdown = shared.shutdown_receiver();
    if !sleep_or_shutdown(shared.connection.startup_grace(), &mut shutdown).await {
        return;
    }

    let mut state_rx = shared.state.subscribe();
    let mut backoff = Backoff::new(shared.connection.retry_interval(), &shared.reconnection);
    let mut outage: Option<Outage> = None;

    loop {
        let current = state_rx.borrow_and_update().clone();
        let Some(session) = current.session() else {
            let outage = outage.get_or_insert_with(|| Outage {
                started: Instant::now(),
                waits: 0,
            });
            let elapsed = outage.started.elapsed();
            let give_up = shared.reconnection.give_up;
            if give_up.is_exhausted(outage.waits, elapsed) {
                error!(
                    waits = outage.waits,
                    elapsed_secs = elapsed.as_secs(),
                    policy = ?give_up,
                    "Giving up on InfluxDB; activity gauges stay at 0"
                );
                shared.halt_connector();
                return;
            }

            let mut delay = backoff.next_delay();
            if let Some(remaining) = give_up.remaining(elapsed) {
                delay = delay.min(remaining);
            }
            outage.waits += 1;
            info!(
                delay_secs = delay.as_secs_f64(),
                "InfluxDB client is not connected, waiting for reconnection"
            );
            match wait_for_connection(&mut state_rx, delay, &mut shutdown).await {
                Wake::Shutdown => break,
                Wake::Connected | Wake::TimedOut => continue,
            }
        };

        if let Some(ended) = outage.take() {
            info!(
                waits = ended.waits,
                outage_secs = ended.started.elapsed().as_secs(),
                "InfluxDB connection restored, polling resumed"
            );
            backoff.reset();
        }

        let pause = match poll_round(&shared, &session).await {
            Ok(_) => shared.connection.poll_interval(),
            Err(_) => shared.connection.failure_pause(),
        };
        if !sleep_or_shutdown(pause, &mut shutdown).await {
            break;
        }
    }
    debug!("Poller stopped");
}

/// Query all three series in order and publish the result.
///
/// A series without points keeps its previous value. Any failure marks the
/// session lost, which zeroes all gauges and wakes the connector.
pub(crate) async fn poll_round<F: SessionFactory>(
    shared: &Shared<F>,
    session: &Arc<F::Session>,
) -> Result<GaugeSet, StoreError> {
    match fetch_round(shared, session).await {
        Ok(gauges) => {
            shared.publish(gauges);
            debug!(
                execution = gauges.execution,
                node = gauges.node,
                consensus = gauges.consensus,
                "Activity gauges published"
            );
            Ok(gauges)
        }
        Err(err) => {
            error!(
                kind = err.kind(),
                error = %describe(&err),
                "Error fetching latest InfluxDB records"
            );
            shared.mark_lost(session);
            Err(err)
        }
    }
}

async fn fetch_round<F: SessionFactory>(
    shared: &Shared<F>,
    session: &F::Session,
) -> Result<GaugeSet, StoreError> {
    let mut staged = shared.gauges();
    for series in Series::ALL {
        let query = LatestQuery::new(series, shared.host.clone());
        let points = shared.timed(session.latest(&query)).await?;
        match points.first() {
            Some(point) => staged.set(series, point.percent()),
            None => debug!(%series, "No points returned, keeping previous value"),
        }
    }
    Ok(staged)
}

async fn wait_for_connection<S>(
    state_rx: &mut watch::Receiver<ConnectionState<S>>,
    delay: Duration,
    shutdown: &mut watch::Receiver<bool>,
) -> Wake {
    tokio::select! {
        biased;
        _ = shutdown.wait_for(|stop| *stop) => Wake::Shutdown,
        result = state_rx.wait_for(ConnectionState::is_connected) => {
            if result.is_ok() { Wake::Connected } else { Wake::Shutdown }
        }
        _ = tokio::time::sleep(delay) => Wake::TimedOut,
    }
}
