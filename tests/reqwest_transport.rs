//! Drives the real reqwest transport against a one-shot local HTTP server.

use coingecko_session::api::{CoinGeckoSession, Pagination};
use coingecko_session::{CoinGeckoError, Config, ErrorCategory, KeyPlacement};
use futures::FutureExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serves exactly one response and hands back the raw request head.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api/v3/", listener.local_addr().unwrap());
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(String::from_utf8_lossy(&head).into_owned());
    });

    (base_url, rx)
}

#[tokio::test]
async fn test_ping_over_http() {
    let (base_url, head) = serve_once("200 OK", r#"{"gecko_says":"(V3) To the Moon!"}"#).await;
    let config = Config::demo("CG-local").with_base_url(base_url);

    let pong = CoinGeckoSession::new(config)
        .scope(|s| async move { s.ping().await }.boxed())
        .await
        .unwrap();
    assert_eq!(pong, json!({"gecko_says": "(V3) To the Moon!"}));

    let head = head.await.unwrap().to_ascii_lowercase();
    assert!(head.starts_with("get /api/v3/ping http/1.1"), "{head}");
    assert!(head.contains("x-cg-demo-api-key: cg-local"), "{head}");
    assert!(head.contains("user-agent: coingecko-session/"), "{head}");
}

#[tokio::test]
async fn test_query_key_and_pagination_over_http() {
    let (base_url, head) = serve_once("200 OK", "[]").await;
    let config = Config::pro("CG-pro")
        .with_base_url(base_url)
        .with_key_placement(KeyPlacement::Query);

    let mut session = CoinGeckoSession::new(config);
    session.start().await.unwrap();
    let exchanges = session.exchanges(Pagination::page(3, 10)).await.unwrap();
    session.close().await;
    assert_eq!(exchanges, json!([]));

    let head = head.await.unwrap();
    let request_line = head.lines().next().unwrap();
    assert_eq!(
        request_line,
        "GET /api/v3/exchanges?page=3&per_page=10&x_cg_pro_api_key=CG-pro HTTP/1.1"
    );
    assert!(!head.to_ascii_lowercase().contains("x-cg-pro-api-key"));
}

#[tokio::test]
async fn test_http_429_over_http() {
    let (base_url, _head) = serve_once(
        "429 Too Many Requests",
        r#"{"status":{"error_code":429,"error_message":"You've exceeded the Rate Limit."}}"#,
    )
    .await;

    let mut session = CoinGeckoSession::new(Config::public().with_base_url(base_url));
    session.start().await.unwrap();
    let err = session.global().await.unwrap_err();
    session.close().await;

    match err {
        CoinGeckoError::Http { status, reason } => {
            assert_eq!(status, 429);
            assert_eq!(reason, "Too Many Requests");
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_over_http() {
    let (base_url, _head) = serve_once("200 OK", "not json").await;

    let mut session = CoinGeckoSession::new(Config::public().with_base_url(base_url));
    session.start().await.unwrap();
    let err = session.exchange_rates().await.unwrap_err();
    session.close().await;

    assert_eq!(err.categorize(), ErrorCategory::Decode);
}

#[tokio::test]
async fn test_connection_refused_is_a_network_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config::public()
        .with_base_url(format!("http://{}/api/v3/", addr))
        .with_timeout(Duration::from_secs(5));
    let mut session = CoinGeckoSession::new(config);
    session.start().await.unwrap();
    let err = session.ping().await.unwrap_err();
    session.close().await;

    assert_eq!(err.categorize(), ErrorCategory::Network);
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.downcast_ref::<reqwest::Error>().is_some());
}
