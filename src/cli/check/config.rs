use std::path::Path;

use crate::error::Result;
use crate::infrastructure::config::reconnect::GiveUpPolicy;
use crate::infrastructure::config::settings::Config;

/// Validate configuration file without starting the dashboard.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    println!("Checking configuration: {}", path.display());
    println!();

    let config = Config::load(path)?;
    let influx = &config.influx;
    let reconnection = &config.reconnection;

    println!("✓ Configuration file is valid");
    println!();
    println!("Summary:");
    println!("  Endpoint: {}", influx.base_url()?);
    println!("  Database: {}", influx.database);
    println!("  Host tag: {}", influx.resolve_host_tag());
    println!(
        "  Poll interval: {}s (timeout {}s)",
        influx.poll_interval_secs, influx.timeout_secs
    );
    println!(
        "  Reconnect: {:?} from {}s, capped at {}s",
        reconnection.backoff, influx.retry_interval_secs, reconnection.max_delay_secs
    );
    match reconnection.give_up {
        GiveUpPolicy::Never => println!("  Give up: never"),
        GiveUpPolicy::Attempts(n) => println!("  Give up: after {n} failed attempts"),
        GiveUpPolicy::WindowSecs(s) => println!("  Give up: after {s}s disconnected"),
    }
    println!();

    if influx.username.is_empty() {
        println!("⚠ No credentials configured");
        println!("  Set INFLUXDB_USERNAME and INFLUXDB_PASSWORD if the server requires auth");
    } else {
        println!("✓ Credentials found for user {}", influx.username);
    }

    println!();
    println!("Configuration is ready to use.");
    Ok(())
}
