//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for credentials (`INFLUXDB_USERNAME`, `INFLUXDB_PASSWORD`).
//!
//! # Example
//!
//! ```no_run
//! use hwmonitor::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::dashboard::DashboardConfig;
use super::influx::ConnectionConfig;
use super::logging::LoggingConfig;
use super::reconnect::{GiveUpPolicy, ReconnectionConfig};
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Time-series store connection.
    #[serde(default)]
    pub influx: ConnectionConfig,

    /// Reconnection backoff and give-up policy.
    #[serde(default)]
    pub reconnection: ReconnectionConfig,

    /// Display loop settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from a TOML string.
    ///
    /// Credentials from the environment replace the ones in the file.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Ok(username) = std::env::var("INFLUXDB_USERNAME") {
            config.influx.username = username;
        }
        if let Ok(password) = std::env::var("INFLUXDB_PASSWORD") {
            config.influx.password = password;
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        let influx = &self.influx;
        if influx.host.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "host" }.into());
        }
        if influx.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if influx.port == 0 {
            return Err(invalid("port", "must be non-zero"));
        }
        if let Err(e) = influx.base_url() {
            return Err(invalid("host", &e.to_string()));
        }
        if influx.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be greater than 0"));
        }
        if influx.retry_interval_secs == 0 {
            return Err(invalid("retry_interval_secs", "must be greater than 0"));
        }
        if influx.poll_interval_secs == 0 {
            return Err(invalid("poll_interval_secs", "must be greater than 0"));
        }

        let reconnection = &self.reconnection;
        if !(reconnection.backoff_multiplier >= 1.0 && reconnection.backoff_multiplier.is_finite())
        {
            return Err(invalid("backoff_multiplier", "must be a finite value >= 1.0"));
        }
        if reconnection.max_delay_secs < influx.retry_interval_secs {
            return Err(invalid(
                "max_delay_secs",
                "must not be smaller than retry_interval_secs",
            ));
        }
        match reconnection.give_up {
            GiveUpPolicy::Attempts(0) => {
                return Err(invalid("give_up", "attempts must be greater than 0"));
            }
            GiveUpPolicy::WindowSecs(0) => {
                return Err(invalid("give_up", "window_secs must be greater than 0"));
            }
            _ => {}
        }

        let dashboard = &self.dashboard;
        if dashboard.refresh_interval_ms == 0 {
            return Err(invalid("refresh_interval_ms", "must be greater than 0"));
        }
        if dashboard.medium_every == 0 || dashboard.slow_every == 0 {
            return Err(invalid("medium_every/slow_every", "must be greater than 0"));
        }

        if let Err(e) = self.logging.directives() {
            return Err(invalid("level", &e.to_string()));
        }

        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}
