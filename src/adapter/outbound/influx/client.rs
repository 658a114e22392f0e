//! InfluxDB 1.x HTTP session.

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use tracing::trace;
use url::Url;

use super::query::{parse_points, render};
use crate::domain::{ActivityPoint, LatestQuery};
use crate::error::{Result, StoreError};
use crate::infrastructure::config::influx::ConnectionConfig;
use crate::port::{SeriesSession, SessionFactory};

/// Opens [`InfluxSession`]s against one server and database.
#[derive(Clone)]
pub struct InfluxSessionFactory {
    config: ConnectionConfig,
    base_url: Url,
    ping_url: Url,
    query_url: Url,
}

impl InfluxSessionFactory {
    /// # Errors
    ///
    /// Returns an error if host and port do not form a valid URL.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let ping_url = base_url.join("ping")?;
        let query_url = base_url.join("query")?;
        Ok(Self {
            config,
            base_url,
            ping_url,
            query_url,
        })
    }
}

#[async_trait]
impl SessionFactory for InfluxSessionFactory {
    type Session = InfluxSession;

    async fn open(&self) -> std::result::Result<InfluxSession, StoreError> {
        let timeout = self.config.timeout();
        let http = HttpClient::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| StoreError::Unreachable(format!("failed to build HTTP client: {e}")))?;

        let credentials = if self.config.username.is_empty() {
            None
        } else {
            Some((self.config.username.clone(), self.config.password.clone()))
        };

        Ok(InfluxSession {
            http,
            ping_url: self.ping_url.clone(),
            query_url: self.query_url.clone(),
            database: self.config.database.clone(),
            credentials,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.config.database)
    }
}

/// One HTTP client bound to a server, database and credentials.
pub struct InfluxSession {
    http: HttpClient,
    ping_url: Url,
    query_url: Url,
    database: String,
    credentials: Option<(String, String)>,
}

impl InfluxSession {
    async fn get(&self, request: reqwest::RequestBuilder) -> std::result::Result<String, StoreError> {
        let request = match &self.credentials {
            Some((username, password)) => request.basic_auth(username, Some(password)),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::AuthFailure(format!("HTTP {status}")));
        }
        if status.is_server_error() {
            return Err(StoreError::Unreachable(format!("HTTP {status}")));
        }

        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(StoreError::MalformedResponse(format!("HTTP {status}: {body}")))
        }
    }
}

#[async_trait]
impl SeriesSession for InfluxSession {
    async fn ping(&self) -> std::result::Result<(), StoreError> {
        self.get(self.http.get(self.ping_url.clone())).await.map(|_| ())
    }

    async fn latest(&self, query: &LatestQuery) -> std::result::Result<Vec<ActivityPoint>, StoreError> {
        let influxql = render(query);
        trace!(query = %influxql, "Running InfluxQL");
        let request = self
            .http
            .get(self.query_url.clone())
            .query(&[("db", self.database.as_str()), ("q", influxql.as_str())]);
        let body = self.get(request).await?;
        parse_points(&body)
    }
}
