//! Connector task: moves the store from `Disconnected` to `Connected`.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::backoff::Backoff;
use super::state::ConnectionState;
use super::store::{sleep_or_shutdown, Shared};
use crate::error::{describe, StoreError};
use crate::port::{SeriesSession, SessionFactory};

/// Connector task body: connect, then reconnect whenever the poller asks.
///
/// Each request restarts the backoff schedule from the first attempt. Stops
/// when halted, which happens on shutdown and when the poller gives up.
pub(crate) async fn run<F: SessionFactory>(shared: Arc<Shared<F>>) {
    let mut halt = shared.halt_receiver();
    loop {
        if !connect(&shared, &mut halt).await {
            break;
        }
        tokio::select! {
            _ = shared.reconnect.notified() => {
                debug!("Reconnect requested");
            }
            _ = halt.wait_for(|stop| *stop) => break,
        }
    }
    debug!("Connector stopped");
}

/// Retry until a probed session is installed.
///
/// Returns `false` if halted before a session could be installed.
pub(crate) async fn connect<F: SessionFactory>(
    shared: &Shared<F>,
    halt: &mut watch::Receiver<bool>,
) -> bool {
    let mut backoff = Backoff::new(shared.connection.retry_interval(), &shared.reconnection);

    while !shared.is_connected() {
        if *halt.borrow() {
            return false;
        }
        match open_session(shared).await {
            Ok(_) if *halt.borrow() => return false,
            Ok(session) => {
                shared
                    .state
                    .send_replace(ConnectionState::Connected(Arc::new(session)));
                info!(
                    endpoint = %shared.factory.endpoint(),
                    attempts = backoff.attempts() + 1,
                    "InfluxDB connection successful"
                );
                break;
            }
            Err(err) => {
                warn!(
                    kind = err.kind(),
                    error = %describe(&err),
                    "InfluxDB connection failed"
                );
                let delay = backoff.next_delay();
                info!(
                    delay_secs = delay.as_secs_f64(),
                    attempt = backoff.attempts(),
                    "Retrying InfluxDB connection"
                );
                if !sleep_or_shutdown(delay, halt).await {
                    return false;
                }
            }
        }
    }
    true
}

/// Open a session and prove it is alive. A session failing the probe is dropped.
async fn open_session<F: SessionFactory>(shared: &Shared<F>) -> Result<F::Session, StoreError> {
    let session = shared.timed(shared.factory.open()).await?;
    shared.timed(session.ping()).await?;
    Ok(session)
}
