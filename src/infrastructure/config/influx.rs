//! Time-series store connection settings.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::error::Result;

/// Immutable settings for the InfluxDB session and the polling cadence.
///
/// Supplied once when the metrics store is built; never mutated afterwards.
#[derive(Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Server host name or address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Server HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Use `https` instead of `http`.
    #[serde(default)]
    pub use_tls: bool,
    /// Username for basic auth. Overridden by `INFLUXDB_USERNAME`.
    #[serde(default)]
    pub username: String,
    /// Password for basic auth. Overridden by `INFLUXDB_PASSWORD`.
    #[serde(default)]
    pub password: String,
    /// Target database.
    #[serde(default = "default_database")]
    pub database: String,
    /// Timeout applied to session open, probe and every query (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Base interval between reconnection attempts (seconds).
    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,
    /// Sleep between successful poll rounds (seconds).
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Delay between launching the connector and the first poll round (seconds).
    #[serde(default = "default_startup_grace_secs")]
    pub startup_grace_secs: u64,
    /// Pause after a failed round before the poller looks again (seconds).
    #[serde(default = "default_failure_pause_secs")]
    pub failure_pause_secs: u64,
    /// Host identifier used in the `host` tag filter. Defaults to the local hostname.
    #[serde(default)]
    pub host_tag: Option<String>,
}

fn default_host() -> String {
    "localhost".into()
}

const fn default_port() -> u16 {
    8086
}

fn default_database() -> String {
    "ethonrpi".into()
}

const fn default_timeout_secs() -> u64 {
    5
}

const fn default_retry_interval_secs() -> u64 {
    10
}

const fn default_poll_interval_secs() -> u64 {
    10
}

const fn default_startup_grace_secs() -> u64 {
    3
}

const fn default_failure_pause_secs() -> u64 {
    3
}

impl ConnectionConfig {
    /// Base URL of the HTTP API, e.g. `http://localhost:8086/`.
    pub fn base_url(&self) -> Result<Url> {
        let scheme = if self.use_tls { "https" } else { "http" };
        Ok(Url::parse(&format!("{scheme}://{}:{}/", self.host, self.port))?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn startup_grace(&self) -> Duration {
        Duration::from_secs(self.startup_grace_secs)
    }

    pub fn failure_pause(&self) -> Duration {
        Duration::from_secs(self.failure_pause_secs)
    }

    /// Host identifier for the series tag filter.
    ///
    /// Falls back to the local hostname, then to `localhost`.
    pub fn resolve_host_tag(&self) -> String {
        if let Some(tag) = self.host_tag.as_deref().map(str::trim) {
            if !tag.is_empty() {
                return tag.to_string();
            }
        }
        local_hostname()
    }
}

/// Local machine hostname, `localhost` when it cannot be read.
pub fn local_hostname() -> String {
    match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            warn!(error = %e, "Unable to read hostname, using localhost");
            "localhost".into()
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            use_tls: false,
            username: String::new(),
            password: String::new(),
            database: default_database(),
            timeout_secs: default_timeout_secs(),
            retry_interval_secs: default_retry_interval_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            startup_grace_secs: default_startup_grace_secs(),
            failure_pause_secs: default_failure_pause_secs(),
            host_tag: None,
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("timeout_secs", &self.timeout_secs)
            .field("retry_interval_secs", &self.retry_interval_secs)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("startup_grace_secs", &self.startup_grace_secs)
            .field("failure_pause_secs", &self.failure_pause_secs)
            .field("host_tag", &self.host_tag)
            .finish()
    }
}
