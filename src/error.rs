use std::borrow::Cow;
use std::fmt::{self, Write as _};

use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures talking to the time-series store.
///
/// An empty result set is never an error; it is `Ok` with no points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("authentication failed: {0}")]
    AuthFailure(String),

    #[error("store unreachable: {0}")]
    Unreachable(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl StoreError {
    /// Short, stable name of the failure kind for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::AuthFailure(_) => "auth_failure",
            Self::Unreachable(_) => "unreachable",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout(describe(&err).into_owned());
        }
        if err.is_connect() || err.is_request() {
            return Self::Unreachable(describe(&err).into_owned());
        }
        if let Some(status) = err.status() {
            if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
                return Self::AuthFailure(status.to_string());
            }
            if status.is_server_error() {
                return Self::Unreachable(status.to_string());
            }
        }
        Self::MalformedResponse(describe(&err).into_owned())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fallback line used when an error cannot be rendered.
pub const UNDESCRIBABLE_ERROR: &str = "error occurred while describing error";

/// Render an error for logging without ever failing.
///
/// A `Display` impl that reports `fmt::Error` would make `format!` panic;
/// this returns a fixed text instead.
pub fn describe(err: &dyn fmt::Display) -> Cow<'static, str> {
    let mut out = String::new();
    match write!(out, "{err}") {
        Ok(()) => Cow::Owned(out),
        Err(_) => Cow::Borrowed(UNDESCRIBABLE_ERROR),
    }
}
