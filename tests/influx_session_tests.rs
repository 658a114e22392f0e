//! InfluxDB HTTP session against a one-shot local responder.

use std::time::Duration;

use hwmonitor::adapter::outbound::influx::InfluxSessionFactory;
use hwmonitor::domain::{HostTag, LatestQuery, Series};
use hwmonitor::error::StoreError;
use hwmonitor::infrastructure::config::influx::ConnectionConfig;
use hwmonitor::port::{SeriesSession, SessionFactory};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const NODE_ROWS: &str = r#"{"results":[{"statement_id":0,"series":[{"name":"status_node","columns":["time","active_percent"],"values":[["2024-05-01T12:00:00Z",62.6]]}]}]}"#;

/// Accept one connection, answer it with `status` and `body`, and return the
/// raw request head.
async fn respond_once(status: &'static str, body: &'static str) -> (u16, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&request).into_owned()
    });
    (port, handle)
}

fn connection(port: u16) -> ConnectionConfig {
    ConnectionConfig {
        host: "127.0.0.1".into(),
        port,
        timeout_secs: 1,
        ..ConnectionConfig::default()
    }
}

fn node_query() -> LatestQuery {
    LatestQuery::new(Series::Node, HostTag::new("eop-1"))
}

#[tokio::test]
async fn ping_succeeds_on_no_content() {
    let (port, request) = respond_once("204 No Content", "").await;
    let session = InfluxSessionFactory::new(connection(port))
        .unwrap()
        .open()
        .await
        .unwrap();

    session.ping().await.unwrap();

    assert!(request.await.unwrap().starts_with("GET /ping "));
}

#[tokio::test]
async fn latest_sends_query_and_parses_rows() {
    let (port, request) = respond_once("200 OK", NODE_ROWS).await;
    let config = ConnectionConfig {
        username: "monitor".into(),
        password: "secret".into(),
        ..connection(port)
    };
    let session = InfluxSessionFactory::new(config).unwrap().open().await.unwrap();

    let points = session.latest(&node_query()).await.unwrap();

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].percent(), 63);
    assert!(points[0].time.is_some());

    let head = request.await.unwrap();
    let request_line = head.lines().next().unwrap_or_default();
    assert!(request_line.starts_with("GET /query?"));
    assert!(request_line.contains("db=ethonrpi"));
    assert!(request_line.contains("status_node"));
    assert!(request_line.contains("eop-1_s"));
    assert!(head.to_ascii_lowercase().contains("authorization: basic"));
}

#[tokio::test]
async fn empty_result_is_not_an_error() {
    let (port, _request) =
        respond_once("200 OK", r#"{"results":[{"statement_id":0}]}"#).await;
    let session = InfluxSessionFactory::new(connection(port))
        .unwrap()
        .open()
        .await
        .unwrap();

    let points = session.latest(&node_query()).await.unwrap();

    assert!(points.is_empty());
}

#[tokio::test]
async fn unauthorized_maps_to_auth_failure() {
    let (port, _request) = respond_once("401 Unauthorized", r#"{"error":"authorization failed"}"#).await;
    let session = InfluxSessionFactory::new(connection(port))
        .unwrap()
        .open()
        .await
        .unwrap();

    let err = session.ping().await.unwrap_err();

    assert!(matches!(err, StoreError::AuthFailure(_)));
}

#[tokio::test]
async fn server_error_maps_to_unreachable() {
    let (port, _request) = respond_once("503 Service Unavailable", "").await;
    let session = InfluxSessionFactory::new(connection(port))
        .unwrap()
        .open()
        .await
        .unwrap();

    let err = session.latest(&node_query()).await.unwrap_err();

    assert!(matches!(err, StoreError::Unreachable(_)));
}

#[tokio::test]
async fn garbage_body_maps_to_malformed_response() {
    let (port, _request) = respond_once("200 OK", "<html>not influx</html>").await;
    let session = InfluxSessionFactory::new(connection(port))
        .unwrap()
        .open()
        .await
        .unwrap();

    let err = session.latest(&node_query()).await.unwrap_err();

    assert!(matches!(err, StoreError::MalformedResponse(_)));
}

#[tokio::test]
async fn refused_connection_maps_to_unreachable() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let session = InfluxSessionFactory::new(connection(port))
        .unwrap()
        .open()
        .await
        .unwrap();

    let err = session.ping().await.unwrap_err();

    assert!(matches!(err, StoreError::Unreachable(_)));
}

#[tokio::test]
async fn silent_server_maps_to_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let _server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        drop(socket);
    });
    let session = InfluxSessionFactory::new(connection(port))
        .unwrap()
        .open()
        .await
        .unwrap();

    let err = session.ping().await.unwrap_err();

    assert!(matches!(err, StoreError::Timeout(_)));
}
