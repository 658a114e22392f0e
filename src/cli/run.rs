//! Handler for the `run` command.

use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::error::{describe, Result};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::logging::LogFormat;
use crate::infrastructure::config::settings::Config;
use crate::port::ActivitySource;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;

    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = LogFormat::Json;
    }
    if let Some(ref path) = args.status_file {
        config.dashboard.status_file = Some(path.clone());
    }

    config.init_logging();
    info!(
        influx = ?config.influx,
        backoff = ?config.reconnection.backoff,
        give_up = ?config.reconnection.give_up,
        "hwmonitor starting"
    );

    let store = bootstrap::build_metrics_store(&config)?;
    store.start();

    let activity: Arc<dyn ActivitySource> = store.clone();
    let display = bootstrap::build_display(&config, activity);
    let display_task = tokio::spawn(display.run(store.shutdown_signal()));

    // The dashboard outlives the poller; only Ctrl-C ends the process.
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %describe(&e), "Failed to listen for Ctrl-C, shutting down");
    } else {
        info!("Shutdown signal received");
    }

    store.shutdown();
    store.join().await;
    let _ = display_task.await;

    info!("hwmonitor stopped");
    Ok(())
}
