use coingecko_session::api::{CoinGeckoSession, MarketsOptions, QueryParams, SessionState};
use coingecko_session::testing::MockTransport;
use coingecko_session::{CoinGeckoError, Config, Endpoint, ErrorCategory, HttpMethod};
use futures::FutureExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn session(transport: &Arc<MockTransport>) -> CoinGeckoSession {
    let _ = env_logger::try_init();
    CoinGeckoSession::with_connector(Config::demo("CG-test-key"), transport.clone())
}

#[tokio::test]
async fn test_ping_returns_literal_payload() {
    let transport = MockTransport::new();
    transport.respond_json("ping", json!({"gecko_says": "(V3) To the Moon!"}));

    let pong = session(&transport)
        .scope(|s| async move { s.ping().await }.boxed())
        .await
        .unwrap();

    assert_eq!(pong, json!({"gecko_says": "(V3) To the Moon!"}));
    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.url.as_str(), "https://api.coingecko.com/api/v3/ping");
    assert_eq!(request.header("x-cg-demo-api-key"), Some("CG-test-key"));
}

#[tokio::test]
async fn test_rate_limited_call_is_not_retried() {
    let transport = MockTransport::new();
    transport.respond_status("coins/markets", 429, "Too Many Requests");

    let result = session(&transport)
        .scope(|s| async move { s.coins_markets("usd", &MarketsOptions::default()).await }.boxed())
        .await;

    let err = result.unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(err.categorize(), ErrorCategory::Http);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_every_endpoint_refuses_a_closed_session() {
    let transport = MockTransport::new();
    transport.respond_default(json!({}));

    let unopened = session(&transport);
    let mut closed = session(&transport);
    closed.start().await.unwrap();
    closed.close().await;
    assert_eq!(closed.state(), SessionState::Closed);

    for s in [&unopened, &closed] {
        for spec in coingecko_session::api::ENDPOINTS {
            let args: Vec<(&str, &str)> = spec.placeholders().map(|p| (p, "x")).collect();
            let params: QueryParams = spec.required.iter().map(|name| (*name, "1")).collect();
            let err = s.call(spec.endpoint, &args, params).await.unwrap_err();
            assert!(
                matches!(err, CoinGeckoError::NoInitialisedSession(_)),
                "{} returned {:?}",
                spec.name,
                err
            );
        }
        assert!(s.ping().await.is_err());
        assert!(s
            .request(HttpMethod::Get, "ping", QueryParams::new())
            .await
            .unwrap_err()
            .is_usage_error());
    }

    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_scope_releases_pool_once_after_failure() {
    let transport = MockTransport::new();
    transport.respond_json("ping", json!({"gecko_says": "(V3) To the Moon!"}));
    transport.respond_status("global", 500, "Internal Server Error");

    let result = session(&transport)
        .scope(|s| {
            async move {
                s.ping().await?;
                s.global().await
            }
            .boxed()
        })
        .await;

    assert_eq!(result.unwrap_err().status_code(), Some(500));
    assert_eq!(transport.request_count(), 2);
    assert_eq!(transport.connect_count(), 1);
    assert_eq!(transport.close_count(), 1);
}

#[tokio::test]
async fn test_scope_releases_pool_on_caller_error() {
    #[derive(Debug)]
    enum AppError {
        Api(CoinGeckoError),
        NoBitcoin,
    }
    impl From<CoinGeckoError> for AppError {
        fn from(err: CoinGeckoError) -> Self {
            AppError::Api(err)
        }
    }

    let transport = MockTransport::new();
    transport.respond_json("simple/supported_vs_currencies", json!(["usd", "eur"]));

    let result: Result<(), AppError> = session(&transport)
        .scope(|s| {
            async move {
                let currencies = s.supported_vs_currencies().await?;
                if currencies.as_array().map_or(true, |c| !c.contains(&json!("btc"))) {
                    return Err(AppError::NoBitcoin);
                }
                Ok(())
            }
            .boxed()
        })
        .await;

    assert!(matches!(result, Err(AppError::NoBitcoin)));
    assert_eq!(transport.close_count(), 1);
}

#[tokio::test]
async fn test_round_trip_body_is_unmodified() {
    let body = json!({
        "bitcoin": {"usd": 67187.3358, "usd_market_cap": 1.317802988326091e12, "last_updated_at": 1711356300u64},
        "ethereum": {"usd": 3500.12, "note": null, "tags": ["l1", "pos"]}
    });
    let transport = MockTransport::new();
    transport.respond_json("simple/price", body.clone());

    let mut s = session(&transport);
    s.start().await.unwrap();
    let got = s
        .simple_price(&["bitcoin", "ethereum"], &["usd"], &Default::default())
        .await
        .unwrap();
    s.close().await;

    assert_eq!(got, body);
}

#[tokio::test]
async fn test_decode_and_network_errors_surface_directly() {
    let transport = MockTransport::new();
    transport.respond_raw("exchange_rates", "<html>maintenance</html>");
    transport.fail_network("global", "connection reset by peer");

    let mut s = session(&transport);
    s.start().await.unwrap();

    match s.exchange_rates().await.unwrap_err() {
        CoinGeckoError::UnknownResponse { body, .. } => assert_eq!(body, "<html>maintenance</html>"),
        other => panic!("expected decode error, got {other:?}"),
    }

    let err = s.global().await.unwrap_err();
    assert_eq!(err.categorize(), ErrorCategory::Network);
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(
        source.downcast_ref::<std::io::Error>().unwrap().kind(),
        std::io::ErrorKind::ConnectionReset
    );

    assert_eq!(transport.request_count(), 2);
    s.close().await;
}

#[tokio::test]
async fn test_concurrent_calls_share_the_session() {
    let transport = MockTransport::new();
    transport.set_latency(Duration::from_millis(200));
    transport.respond_json("global", json!({"data": {}}));
    transport.respond_json("search/trending", json!({"coins": []}));
    transport.respond_json("exchange_rates", json!({"rates": {}}));

    let mut s = session(&transport);
    s.start().await.unwrap();

    let started = Instant::now();
    let (global, trending, rates) =
        tokio::join!(s.global(), s.search_trending(), s.exchange_rates());
    let elapsed = started.elapsed();

    assert_eq!(global.unwrap(), json!({"data": {}}));
    assert_eq!(trending.unwrap(), json!({"coins": []}));
    assert_eq!(rates.unwrap(), json!({"rates": {}}));
    assert!(elapsed < Duration::from_millis(550), "calls ran sequentially: {elapsed:?}");

    s.close().await;
    assert_eq!(transport.close_count(), 1);
}

#[tokio::test]
async fn test_shared_transport_is_left_open() {
    let transport = MockTransport::new();
    transport.respond_json("ping", json!({"gecko_says": "(V3) To the Moon!"}));

    for _ in 0..2 {
        let s = CoinGeckoSession::with_transport(Config::public(), transport.clone());
        assert!(!s.owns_transport());
        s.scope(|s| async move { s.ping().await }.boxed())
            .await
            .unwrap();
    }

    assert_eq!(transport.request_count(), 2);
    assert_eq!(transport.connect_count(), 0);
    assert_eq!(transport.close_count(), 0);
}

#[tokio::test]
async fn test_raw_post_request() {
    let transport = MockTransport::new();
    transport.respond_json("onchain/search/pools", json!({"data": []}));

    let mut s = session(&transport);
    s.start().await.unwrap();
    let value: Value = s
        .request(
            HttpMethod::Post,
            "/onchain/search/pools",
            QueryParams::new().with("query", "weth"),
        )
        .await
        .unwrap();
    s.close().await;

    assert_eq!(value, json!({"data": []}));
    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(
        request.url.as_str(),
        "https://api.coingecko.com/api/v3/onchain/search/pools?query=weth"
    );
}

#[tokio::test]
async fn test_call_by_table_name() {
    let transport = MockTransport::new();
    transport.respond_json("coins/bitcoin/market_chart", json!({"prices": [[1, 2.0]]}));

    let mut s = session(&transport);
    s.start().await.unwrap();
    let spec = coingecko_session::api::lookup("coin_market_chart").unwrap();
    assert_eq!(spec.endpoint, Endpoint::CoinMarketChart);

    let chart = s
        .call(
            spec.endpoint,
            &[("id", "bitcoin")],
            QueryParams::new().with("vs_currency", "usd").with("days", "max"),
        )
        .await
        .unwrap();
    s.close().await;

    assert_eq!(chart["prices"][0][1], json!(2.0));
}

#[tokio::test]
async fn test_blank_required_params_are_refused_before_sending() {
    let transport = MockTransport::new();
    transport.respond_default(json!({}));

    let mut s = session(&transport);
    s.start().await.unwrap();

    let no_ids: [&str; 0] = [];
    let err = s
        .simple_price(&no_ids, &no_ids, &Default::default())
        .await
        .unwrap_err();
    assert!(
        matches!(err, CoinGeckoError::MissingParameter { parameter: "ids", .. }),
        "{err:?}"
    );

    let err = s
        .coins_markets("", &MarketsOptions::default())
        .await
        .unwrap_err();
    assert!(
        matches!(err, CoinGeckoError::MissingParameter { parameter: "vs_currency", .. }),
        "{err:?}"
    );
    assert!(err.is_usage_error());

    s.close().await;
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_raw_route_query_is_merged_into_params() {
    let transport = MockTransport::new();
    transport.respond_json("coins/list", json!([]));

    let mut s = session(&transport);
    s.start().await.unwrap();
    s.request(
        HttpMethod::Get,
        "coins/list?include_platform=true&status=in%20active",
        QueryParams::new().with("include_platform", false),
    )
    .await
    .unwrap();
    s.close().await;

    let request = transport.last_request().unwrap();
    assert_eq!(request.url.path(), "/api/v3/coins/list");
    assert_eq!(
        request.query_pairs(),
        vec![
            ("include_platform".to_string(), "false".to_string()),
            ("status".to_string(), "in active".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_extra_params_through_call() {
    // Parameters the typed methods do not expose go through `call` on the same table row.
    let transport = MockTransport::new();
    transport.respond_json("exchanges/binance", json!({"name": "Binance"}));

    let mut s = session(&transport);
    s.start().await.unwrap();
    let exchange = s
        .call(
            Endpoint::Exchange,
            &[("id", "binance")],
            QueryParams::new().with("dex_pair_format", "symbol"),
        )
        .await
        .unwrap();
    s.close().await;

    assert_eq!(exchange["name"], json!("Binance"));
    assert_eq!(
        transport.last_request().unwrap().url.query(),
        Some("dex_pair_format=symbol")
    );
}
