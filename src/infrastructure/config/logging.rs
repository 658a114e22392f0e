//! Logging configuration and subscriber setup.

use serde::Deserialize;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{fmt, EnvFilter};

/// HTTP internals are only interesting when asked for through `RUST_LOG`.
const QUIET_DEPENDENCIES: &str = "hyper=warn,hyper_util=warn,reqwest=warn";

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines for a terminal.
    #[default]
    Pretty,
    /// One JSON object per event, for journald or log shippers.
    Json,
}

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `hwmonitor=debug`.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".into()
}

impl LoggingConfig {
    /// Filter built from the configured level, with chatty HTTP crates capped
    /// at `warn`.
    pub fn directives(&self) -> Result<EnvFilter, ParseError> {
        EnvFilter::builder().parse(format!("{},{QUIET_DEPENDENCIES}", self.level))
    }

    /// Install the global subscriber. `RUST_LOG` replaces the configured level.
    ///
    /// A second call, or an invalid level, is reported on stderr and
    /// otherwise ignored.
    pub fn init(&self) {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => self.directives().unwrap_or_else(|e| {
                eprintln!("invalid log level {:?} ({e}), using info", self.level);
                EnvFilter::new("info")
            }),
        };

        let builder = fmt().with_env_filter(filter).with_target(false);
        let installed = match self.format {
            LogFormat::Json => builder.json().with_current_span(true).try_init(),
            LogFormat::Pretty => builder.try_init(),
        };
        if let Err(e) = installed {
            eprintln!("logging already initialised: {e}");
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}
