//! Composition root for runtime wiring.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::display::{LogSink, StatusFileSink};
use crate::adapter::outbound::host::SysinfoHost;
use crate::adapter::outbound::influx::InfluxSessionFactory;
use crate::application::dashboard::DisplayLoop;
use crate::application::metrics::MetricsStore;
use crate::error::Result;
use crate::infrastructure::config::influx::local_hostname;
use crate::infrastructure::config::settings::Config;
use crate::port::ActivitySource;

/// Metrics store backed by the InfluxDB HTTP API.
pub type InfluxMetricsStore = MetricsStore<InfluxSessionFactory>;

/// Info-level frame summaries roughly every this many seconds.
const LOG_SUMMARY_SECS: u64 = 60;

/// Build the metrics store from configuration. The caller starts it.
///
/// # Errors
///
/// Returns an error if the connection settings do not form a valid URL.
pub fn build_metrics_store(config: &Config) -> Result<Arc<InfluxMetricsStore>> {
    let factory = InfluxSessionFactory::new(config.influx.clone())?;
    let store = MetricsStore::new(factory, config.influx.clone(), config.reconnection.clone());
    Ok(Arc::new(store))
}

/// Build the display loop with its sinks: always a log sink, plus a status
/// file when one is configured.
pub fn build_display(config: &Config, activity: Arc<dyn ActivitySource>) -> DisplayLoop<SysinfoHost> {
    let dashboard = config.dashboard.clone();
    let host = SysinfoHost::new(dashboard.disk_path.clone(), dashboard.interfaces.clone());
    let summary_every = (LOG_SUMMARY_SECS * 1000 / dashboard.refresh_interval_ms.max(1)).max(1);
    let status_file = dashboard.status_file.clone();

    let mut display = DisplayLoop::new(local_hostname(), host, activity, dashboard)
        .with_sink(Box::new(LogSink::new(summary_every)));

    if let Some(path) = status_file {
        info!(path = %path.display(), "Writing status file");
        display = display.with_sink(Box::new(StatusFileSink::new(path)));
    }
    display
}
