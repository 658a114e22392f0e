//! Connector/poller behavior under Tokio's paused clock.
//!
//! With the default test configuration the poller's first round runs at
//! t = 3 s (startup grace) and then every 10 s; the connector retries every
//! 10 s under the fixed policy.

use std::sync::Arc;
use std::time::Duration;

use hwmonitor::application::metrics::MetricsStore;
use hwmonitor::domain::{GaugeSet, Series};
use hwmonitor::error::StoreError;
use hwmonitor::infrastructure::config::reconnect::{GiveUpPolicy, ReconnectionConfig};
use hwmonitor::testkit::config;
use hwmonitor::testkit::session::{no_rows, rows, ScriptedFactory};

fn store(factory: ScriptedFactory, reconnection: ReconnectionConfig) -> MetricsStore<ScriptedFactory> {
    MetricsStore::with_host(factory, config::connection(), reconnection, config::host())
}

fn unreachable() -> StoreError {
    StoreError::Unreachable("connection refused".into())
}

async fn advance_to(secs: f64, started: tokio::time::Instant) {
    tokio::time::sleep_until(started + Duration::from_secs_f64(secs)).await;
}

const GAUGES: GaugeSet = GaugeSet {
    execution: 100,
    node: 63,
    consensus: 50,
};

#[tokio::test(start_paused = true)]
async fn gauges_published_after_startup_when_server_is_up() {
    let t0 = tokio::time::Instant::now();
    let factory = ScriptedFactory::new().with_all(100.0, 62.6, 50.0);
    let store = store(factory, config::fixed_reconnection());

    assert!(store.start());
    assert_eq!(store.gauges(), GaugeSet::ZERO);

    advance_to(4.0, t0).await;

    assert!(store.is_connected());
    assert_eq!(store.execution_activity(), 100);
    assert_eq!(store.node_activity(), 63);
    assert_eq!(store.consensus_activity(), 50);

    let snapshot = store.snapshot();
    assert!(snapshot.connected);
    assert!(snapshot.published_at.is_some());
}

#[tokio::test(start_paused = true)]
async fn gauges_stay_zero_until_server_comes_up() {
    let t0 = tokio::time::Instant::now();
    let factory = ScriptedFactory::new().with_all(100.0, 63.0, 50.0);
    let script = factory.handle();
    script.set_outage(Some(unreachable()));
    let store = store(factory, config::fixed_reconnection());
    store.start();

    advance_to(25.0, t0).await;
    assert!(!store.is_connected());
    assert_eq!(store.gauges(), GaugeSet::ZERO);
    assert_eq!(script.open_count(), 3); // t = 0, 10, 20
    assert_eq!(script.query_count(), 0);

    script.set_outage(None);
    advance_to(31.0, t0).await;

    assert!(store.is_connected());
    assert_eq!(store.gauges(), GAUGES);
}

#[tokio::test(start_paused = true)]
async fn outage_zeroes_gauges_and_recovery_restores_them() {
    let t0 = tokio::time::Instant::now();
    let factory = ScriptedFactory::new().with_all(100.0, 63.0, 50.0);
    let script = factory.handle();
    let store = store(factory, config::fixed_reconnection());
    store.start();

    advance_to(4.0, t0).await;
    assert_eq!(store.gauges(), GAUGES);

    script.set_outage(Some(unreachable()));
    advance_to(14.0, t0).await; // round at t = 13 fails

    assert!(!store.is_connected());
    assert_eq!(store.gauges(), GaugeSet::ZERO);
    assert!(!store.snapshot().connected);

    script.set_outage(None);
    advance_to(24.0, t0).await; // connector retries at t = 23

    assert!(store.is_connected());
    assert_eq!(store.gauges(), GAUGES);
}

#[tokio::test(start_paused = true)]
async fn rounds_are_spaced_by_poll_interval() {
    let t0 = tokio::time::Instant::now();
    let factory = ScriptedFactory::new().with_all(10.0, 20.0, 30.0);
    let script = factory.handle();
    let store = store(factory, config::fixed_reconnection());
    store.start();

    advance_to(45.0, t0).await;

    let starts: Vec<_> = script
        .queries()
        .into_iter()
        .filter(|(series, _)| *series == Series::Execution)
        .map(|(_, at)| at)
        .collect();
    assert_eq!(starts.len(), 5); // t = 3, 13, 23, 33, 43
    assert_eq!(starts[0] - t0, Duration::from_secs(3));
    for pair in starts.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_secs(10));
    }
}

#[tokio::test(start_paused = true)]
async fn each_round_queries_series_in_order() {
    let t0 = tokio::time::Instant::now();
    let factory = ScriptedFactory::new();
    let script = factory.handle();
    let store = store(factory, config::fixed_reconnection());
    store.start();

    advance_to(4.0, t0).await;

    let order: Vec<_> = script.queries().into_iter().map(|(series, _)| series).collect();
    assert_eq!(order, Series::ALL.to_vec());
}

#[tokio::test(start_paused = true)]
async fn start_is_idempotent() {
    let store = store(ScriptedFactory::new(), config::fixed_reconnection());
    assert!(store.start());
    assert!(!store.start());
    assert!(store.is_polling());
}

#[tokio::test(start_paused = true)]
async fn identical_rounds_publish_identical_gauges() {
    let factory = ScriptedFactory::new().with_all(99.5, 63.0, 0.4);
    let store = store(factory, config::fixed_reconnection());
    store.connect().await;

    let first = store.poll_once().await.unwrap();
    let second = store.poll_once().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        second,
        GaugeSet {
            execution: 100,
            node: 63,
            consensus: 0,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn empty_series_keeps_previous_value() {
    let factory = ScriptedFactory::new().with_all(40.0, 55.0, 70.0);
    let script = factory.handle();
    let store = store(factory, config::fixed_reconnection());
    store.connect().await;

    store.poll_once().await.unwrap();
    script.push_response(Series::Node, no_rows());
    script.push_response(Series::Execution, rows(41.0));

    let gauges = store.poll_once().await.unwrap();

    assert_eq!(
        gauges,
        GaugeSet {
            execution: 41,
            node: 55,
            consensus: 70,
        }
    );
    assert_eq!(store.gauges(), gauges);
}

#[tokio::test(start_paused = true)]
async fn empty_first_round_leaves_zero() {
    let factory = ScriptedFactory::new().with_default(Series::Consensus, rows(12.0));
    let store = store(factory, config::fixed_reconnection());
    store.connect().await;

    let gauges = store.poll_once().await.unwrap();

    assert_eq!(gauges.execution, 0);
    assert_eq!(gauges.node, 0);
    assert_eq!(gauges.consensus, 12);
}

#[tokio::test(start_paused = true)]
async fn failed_round_publishes_nothing_and_disconnects() {
    let factory = ScriptedFactory::new().with_all(100.0, 63.0, 50.0);
    let script = factory.handle();
    let store = store(factory, config::fixed_reconnection());
    store.connect().await;
    store.poll_once().await.unwrap();

    script.push_response(Series::Execution, rows(5.0));
    script.push_response(
        Series::Consensus,
        Err(StoreError::MalformedResponse("bad json".into())),
    );
    let err = store.poll_once().await.unwrap_err();

    assert!(matches!(err, StoreError::MalformedResponse(_)));
    assert_eq!(store.gauges(), GaugeSet::ZERO);
    assert!(!store.is_connected());
    assert!(store.state().session().is_none());
}

#[tokio::test(start_paused = true)]
async fn poll_without_session_is_unreachable() {
    let store = store(ScriptedFactory::new(), config::fixed_reconnection());

    let err = store.poll_once().await.unwrap_err();

    assert_eq!(err.kind(), "unreachable");
    assert_eq!(store.gauges(), GaugeSet::ZERO);
}

#[tokio::test(start_paused = true)]
async fn slow_query_times_out() {
    let factory = ScriptedFactory::new().with_all(100.0, 63.0, 50.0);
    let script = factory.handle();
    let store = store(factory, config::fixed_reconnection());
    store.connect().await;
    store.poll_once().await.unwrap();

    script.set_latency(Duration::from_secs(6));
    let err = store.poll_once().await.unwrap_err();

    assert!(matches!(err, StoreError::Timeout(_)));
    assert_eq!(store.gauges(), GaugeSet::ZERO);
    assert!(!store.is_connected());
}

#[tokio::test(start_paused = true)]
async fn getters_do_not_wait_for_inflight_round() {
    let factory = ScriptedFactory::new().with_all(100.0, 63.0, 50.0);
    let script = factory.handle();
    let store = Arc::new(store(factory, config::fixed_reconnection()));
    store.connect().await;
    store.poll_once().await.unwrap();

    script.set_latency(Duration::from_secs(4));
    script.push_response(Series::Execution, rows(1.0));
    let inflight = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.poll_once().await }
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(store.gauges(), GAUGES);

    let gauges = inflight.await.unwrap().unwrap();
    assert_eq!(gauges.execution, 1);
    assert_eq!(store.execution_activity(), 1);
}

#[tokio::test(start_paused = true)]
async fn late_failure_of_replaced_session_is_ignored() {
    let factory = ScriptedFactory::new().with_all(100.0, 63.0, 50.0);
    let script = factory.handle();
    let store = Arc::new(store(factory, config::fixed_reconnection()));
    store.connect().await;

    // A slow round on the first session that will fail.
    script.set_latency(Duration::from_secs(4));
    script.push_response(Series::Execution, Err(unreachable()));
    let stale = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.poll_once().await }
    });
    tokio::time::sleep(Duration::from_millis(1)).await;

    // Meanwhile a fast round fails, a new session is opened and published.
    script.set_latency(Duration::ZERO);
    script.push_response(Series::Execution, Err(unreachable()));
    assert!(store.poll_once().await.is_err());
    store.connect().await;
    assert_eq!(store.poll_once().await.unwrap(), GAUGES);

    assert!(stale.await.unwrap().is_err());

    assert!(store.is_connected());
    assert_eq!(store.gauges(), GAUGES);
    assert!(store.snapshot().connected);
}

#[tokio::test(start_paused = true)]
async fn snapshot_after_failure_is_disconnected_and_zero() {
    let factory = ScriptedFactory::new().with_all(100.0, 63.0, 50.0);
    let script = factory.handle();
    let store = store(factory, config::fixed_reconnection());
    store.connect().await;
    store.poll_once().await.unwrap();
    assert_eq!(store.snapshot().gauges, GAUGES);

    script.push_response(Series::Node, Err(unreachable()));
    assert!(store.poll_once().await.is_err());

    let snapshot = store.snapshot();
    assert!(!snapshot.connected);
    assert_eq!(snapshot.gauges, GaugeSet::ZERO);
    assert!(snapshot.published_at.is_none());
}

#[tokio::test(start_paused = true)]
async fn failed_probe_discards_session() {
    let t0 = tokio::time::Instant::now();
    let factory = ScriptedFactory::new()
        .with_ping_results(vec![Err(StoreError::AuthFailure("HTTP 401".into()))]);
    let script = factory.handle();
    let store = store(factory, config::fixed_reconnection());
    store.start();

    advance_to(5.0, t0).await;
    assert_eq!(script.open_count(), 1);
    assert_eq!(script.ping_count(), 1);
    assert!(!store.is_connected());

    advance_to(11.0, t0).await;
    assert_eq!(script.open_count(), 2);
    assert!(store.is_connected());
}

#[tokio::test(start_paused = true)]
async fn exponential_backoff_spaces_connect_attempts() {
    let t0 = tokio::time::Instant::now();
    let factory = ScriptedFactory::new();
    let script = factory.handle();
    script.set_outage(Some(unreachable()));
    let store = store(factory, config::exponential_reconnection());
    store.start();

    // Attempts at t = 0, 10, 25, 47.5, 81.25.
    advance_to(24.0, t0).await;
    assert_eq!(script.open_count(), 2);
    advance_to(26.0, t0).await;
    assert_eq!(script.open_count(), 3);
    advance_to(47.0, t0).await;
    assert_eq!(script.open_count(), 3);
    advance_to(48.0, t0).await;
    assert_eq!(script.open_count(), 4);
    advance_to(82.0, t0).await;
    assert_eq!(script.open_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn gives_up_after_attempt_cap() {
    let t0 = tokio::time::Instant::now();
    let factory = ScriptedFactory::new();
    let script = factory.handle();
    script.set_outage(Some(unreachable()));
    let store = store(factory, config::capped_reconnection(GiveUpPolicy::Attempts(3)));
    store.start();

    // Waits start at t = 3, 13, 23; the check at t = 33 gives up.
    advance_to(30.0, t0).await;
    assert!(store.is_polling());

    advance_to(34.0, t0).await;
    assert!(!store.is_polling());
    assert!(!store.is_shut_down());
    assert_eq!(store.gauges(), GaugeSet::ZERO);
    assert!(!store.snapshot().connected);

    // The connector stops with the poller.
    let opens = script.open_count();
    advance_to(120.0, t0).await;
    assert_eq!(script.open_count(), opens);
}

#[tokio::test(start_paused = true)]
async fn giving_up_leaves_store_readable_and_shutdown_signal_untouched() {
    let t0 = tokio::time::Instant::now();
    let factory = ScriptedFactory::new().with_all(100.0, 63.0, 50.0);
    let script = factory.handle();
    let store = store(factory, config::capped_reconnection(GiveUpPolicy::Attempts(2)));
    let shutdown = store.shutdown_signal();
    store.start();

    advance_to(4.0, t0).await;
    assert_eq!(store.gauges(), GAUGES);

    // Round at t = 13 fails; waits at t = 16 and 26; gives up at t = 36.
    script.set_outage(Some(unreachable()));
    advance_to(37.0, t0).await;

    assert!(!store.is_polling());
    assert!(!store.is_shut_down());
    assert!(!*shutdown.borrow());
    assert_eq!(store.execution_activity(), 0);
    assert_eq!(store.node_activity(), 0);
    assert_eq!(store.consensus_activity(), 0);

    // Gauges stay pinned at 0 even once the server is back.
    script.set_outage(None);
    advance_to(120.0, t0).await;
    assert_eq!(store.gauges(), GaugeSet::ZERO);
    assert!(!store.is_shut_down());
}

#[tokio::test(start_paused = true)]
async fn gives_up_after_outage_window() {
    let t0 = tokio::time::Instant::now();
    let factory = ScriptedFactory::new();
    factory.handle().set_outage(Some(unreachable()));
    let store = store(factory, config::capped_reconnection(GiveUpPolicy::WindowSecs(20)));
    store.start();

    // Outage observed from t = 3; the check at t = 23 has waited 20 s.
    advance_to(20.0, t0).await;
    assert!(store.is_polling());

    advance_to(24.0, t0).await;
    assert!(!store.is_polling());
    assert!(!store.is_shut_down());
    assert_eq!(store.gauges(), GaugeSet::ZERO);
}

#[tokio::test(start_paused = true)]
async fn outage_window_is_not_overshot_by_backoff() {
    let t0 = tokio::time::Instant::now();
    let factory = ScriptedFactory::new();
    factory.handle().set_outage(Some(unreachable()));
    let reconnection = ReconnectionConfig {
        give_up: GiveUpPolicy::WindowSecs(30),
        ..config::exponential_reconnection()
    };
    let store = store(factory, reconnection);
    store.start();

    // Waits of 10 s and 15 s from t = 3, then only the 5 s left of the
    // window instead of a full 22.5 s.
    advance_to(32.0, t0).await;
    assert!(store.is_polling());

    advance_to(34.0, t0).await;
    assert!(!store.is_polling());
}

#[tokio::test(start_paused = true)]
async fn never_gives_up_by_default() {
    let t0 = tokio::time::Instant::now();
    let factory = ScriptedFactory::new();
    factory.handle().set_outage(Some(unreachable()));
    let store = store(factory, config::fixed_reconnection());
    store.start();

    advance_to(3600.0, t0).await;

    assert!(!store.is_shut_down());
    assert!(store.is_polling());
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_both_tasks() {
    let t0 = tokio::time::Instant::now();
    let factory = ScriptedFactory::new().with_all(1.0, 2.0, 3.0);
    let script = factory.handle();
    let store = store(factory, config::fixed_reconnection());
    store.start();
    advance_to(5.0, t0).await;

    store.shutdown();
    store.join().await;
    let queries = script.query_count();
    advance_to(60.0, t0).await;

    assert!(store.is_shut_down());
    assert!(!store.is_polling());
    assert_eq!(script.query_count(), queries);
}
