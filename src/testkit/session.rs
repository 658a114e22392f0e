//! Scripted time-series store doubles.
//!
//! [`ScriptedFactory`] opens [`ScriptedSession`]s that share one script:
//! queued open/ping results, per-series query responses with a sticky
//! default, an optional outage that fails everything, and call counters.
//! Keep a [`ScriptHandle`] to inspect counters or change the script while
//! the store is running.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::domain::{ActivityPoint, LatestQuery, Series};
use crate::error::StoreError;
use crate::port::{SeriesSession, SessionFactory};

type QueryResult = Result<Vec<ActivityPoint>, StoreError>;

/// A single-row result with the given `active_percent`.
pub fn rows(active_percent: f64) -> QueryResult {
    Ok(vec![ActivityPoint::new(active_percent)])
}

/// A result with no rows.
pub fn no_rows() -> QueryResult {
    Ok(Vec::new())
}

#[derive(Default)]
struct Script {
    open_results: VecDeque<Result<(), StoreError>>,
    ping_results: VecDeque<Result<(), StoreError>>,
    responses: HashMap<Series, VecDeque<QueryResult>>,
    defaults: HashMap<Series, QueryResult>,
    outage: Option<StoreError>,
    latency: Duration,
    open_count: u32,
    ping_count: u32,
    queries: Vec<(Series, Instant)>,
}

impl Script {
    fn next_response(&mut self, series: Series) -> QueryResult {
        if let Some(err) = &self.outage {
            return Err(err.clone());
        }
        if let Some(result) = self.responses.get_mut(&series).and_then(VecDeque::pop_front) {
            return result;
        }
        self.defaults.get(&series).cloned().unwrap_or_else(no_rows)
    }
}

/// Shared view of a script for assertions and mid-test changes.
#[derive(Clone, Default)]
pub struct ScriptHandle(Arc<Mutex<Script>>);

impl ScriptHandle {
    pub fn open_count(&self) -> u32 {
        self.0.lock().open_count
    }

    pub fn ping_count(&self) -> u32 {
        self.0.lock().ping_count
    }

    pub fn query_count(&self) -> usize {
        self.0.lock().queries.len()
    }

    /// Every query issued so far, with the (Tokio) time it arrived.
    pub fn queries(&self) -> Vec<(Series, Instant)> {
        self.0.lock().queries.clone()
    }

    /// Queue a one-shot response for `series`.
    pub fn push_response(&self, series: Series, result: QueryResult) {
        self.0
            .lock()
            .responses
            .entry(series)
            .or_default()
            .push_back(result);
    }

    /// Response for `series` once its queue is empty.
    pub fn set_default(&self, series: Series, result: QueryResult) {
        self.0.lock().defaults.insert(series, result);
    }

    /// While set, every open, ping and query fails with this error.
    pub fn set_outage(&self, outage: Option<StoreError>) {
        self.0.lock().outage = outage;
    }

    /// Delay added to every query before it answers.
    pub fn set_latency(&self, latency: Duration) {
        self.0.lock().latency = latency;
    }
}

/// Factory handing out sessions bound to one script.
#[derive(Default)]
pub struct ScriptedFactory {
    script: ScriptHandle,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results for successive `open()` calls (default `Ok` when exhausted).
    pub fn with_open_results(self, results: Vec<Result<(), StoreError>>) -> Self {
        self.script.0.lock().open_results = results.into();
        self
    }

    /// Results for successive `ping()` calls (default `Ok` when exhausted).
    pub fn with_ping_results(self, results: Vec<Result<(), StoreError>>) -> Self {
        self.script.0.lock().ping_results = results.into();
        self
    }

    pub fn with_responses(self, series: Series, results: Vec<QueryResult>) -> Self {
        for result in results {
            self.script.push_response(series, result);
        }
        self
    }

    pub fn with_default(self, series: Series, result: QueryResult) -> Self {
        self.script.set_default(series, result);
        self
    }

    /// Same default `active_percent` for every series.
    pub fn with_all(self, execution: f64, node: f64, consensus: f64) -> Self {
        self.with_default(Series::Execution, rows(execution))
            .with_default(Series::Node, rows(node))
            .with_default(Series::Consensus, rows(consensus))
    }

    pub fn handle(&self) -> ScriptHandle {
        self.script.clone()
    }
}

#[async_trait]
impl SessionFactory for ScriptedFactory {
    type Session = ScriptedSession;

    async fn open(&self) -> Result<ScriptedSession, StoreError> {
        let mut script = self.script.0.lock();
        script.open_count += 1;
        if let Some(err) = &script.outage {
            return Err(err.clone());
        }
        script.open_results.pop_front().unwrap_or(Ok(()))?;
        Ok(ScriptedSession {
            script: self.script.clone(),
        })
    }

    fn endpoint(&self) -> String {
        "scripted://test".into()
    }
}

/// Session answering from the shared script.
pub struct ScriptedSession {
    script: ScriptHandle,
}

#[async_trait]
impl SeriesSession for ScriptedSession {
    async fn ping(&self) -> Result<(), StoreError> {
        let mut script = self.script.0.lock();
        script.ping_count += 1;
        if let Some(err) = &script.outage {
            return Err(err.clone());
        }
        script.ping_results.pop_front().unwrap_or(Ok(()))
    }

    async fn latest(&self, query: &LatestQuery) -> QueryResult {
        let (result, latency) = {
            let mut script = self.script.0.lock();
            script.queries.push((query.series, Instant::now()));
            (script.next_response(query.series), script.latency)
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        result
    }
}
