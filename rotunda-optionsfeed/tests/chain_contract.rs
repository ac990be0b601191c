use httpmock::prelude::*;
use rotunda_core::RotundaError;
use rotunda_core::connector::{OptionChainProvider, SourceConnector};
use rotunda_optionsfeed::{ApiAuth, OptionsFeedConnector};
use rotunda_types::{ChainQuery, ContractType, PageRequest, PageToken};
use rust_decimal::Decimal;

const PAGE_ONE: &str = r#"{
  "results": [
    {
      "contract": "AAPL251219C00180000", "underlying": "AAPL", "type": "call",
      "strike": 180.0, "expiry": "2025-12-19",
      "bid": 12.1, "ask": 12.45, "openInterest": 1200, "volume": 340,
      "impliedVolatility": 0.31
    },
    {
      "contract": "AAPL251219P00160000", "underlying": "AAPL", "type": "put",
      "strike": 160.0, "expiry": "2025-12-19"
    }
  ],
  "nextCursor": "c2"
}"#;

const PAGE_TWO: &str = r#"{
  "results": [
    {
      "contract": "AAPL251219P00180000", "underlying": "AAPL", "type": "put",
      "strike": 180.0, "expiry": "2025-12-19", "bid": 6.2, "ask": 6.55
    }
  ],
  "nextCursor": null
}"#;

fn connector(server: &MockServer) -> OptionsFeedConnector {
    OptionsFeedConnector::with_base_url(
        &server.base_url(),
        ApiAuth::QueryKey("test-key".to_string()),
    )
    .unwrap()
}

#[tokio::test]
async fn first_page_is_parsed_with_key_in_query() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/chains/AAPL")
                .query_param("apiKey", "test-key")
                .query_param("limit", "100");
            then.status(200)
                .header("content-type", "application/json")
                .body(PAGE_ONE);
        })
        .await;

    let page = connector(&server)
        .chain_page(&ChainQuery::for_underlying("aapl"), PageRequest::first(100))
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(page.records.len(), 2);
    assert_eq!(page.next, Some(PageToken::Cursor("c2".to_string())));

    let call = &page.records[0];
    assert_eq!(call.contract, "AAPL251219C00180000");
    assert_eq!(call.contract_type, ContractType::Call);
    assert_eq!(call.strike, Decimal::from(180));
    assert_eq!(call.open_interest, Some(1200));

    // Omitted quote fields stay explicitly unknown.
    let put = &page.records[1];
    assert_eq!(put.bid, None);
    assert_eq!(put.implied_volatility, None);
}

#[tokio::test]
async fn cursor_continuation_reaches_the_last_page() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/chains/AAPL")
                .query_param("cursor", "c2");
            then.status(200)
                .header("content-type", "application/json")
                .body(PAGE_TWO);
        })
        .await;

    let page = connector(&server)
        .chain_page(
            &ChainQuery::for_underlying("AAPL"),
            PageRequest::resume(PageToken::Cursor("c2".to_string()), 100),
        )
        .await
        .unwrap();
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.next, None, "null cursor terminates pagination");
}

#[tokio::test]
async fn chain_filters_ride_as_query_parameters() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/chains/AAPL")
                .query_param("expiry", "2025-12-19")
                .query_param("type", "put");
            then.status(200)
                .header("content-type", "application/json")
                .body(PAGE_TWO);
        })
        .await;

    let query = ChainQuery {
        underlying: "AAPL".to_string(),
        expiry: chrono::NaiveDate::from_ymd_opt(2025, 12, 19),
        contract_type: Some(ContractType::Put),
    };
    connector(&server)
        .chain_page(&query, PageRequest::first(100))
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn bearer_auth_uses_the_header_instead_of_the_query() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/chains/AAPL")
                .header("authorization", "Bearer secret");
            then.status(200)
                .header("content-type", "application/json")
                .body(PAGE_TWO);
        })
        .await;

    let connector = OptionsFeedConnector::with_base_url(
        &server.base_url(),
        ApiAuth::Bearer("secret".to_string()),
    )
    .unwrap();
    connector
        .chain_page(&ChainQuery::for_underlying("AAPL"), PageRequest::first(100))
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn unknown_contract_type_is_a_parse_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/chains/AAPL");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"results":[{"contract":"X","underlying":"AAPL","type":"straddle","strike":1.0,"expiry":"2025-12-19"}]}"#);
        })
        .await;

    let err = connector(&server)
        .chain_page(&ChainQuery::for_underlying("AAPL"), PageRequest::first(100))
        .await
        .unwrap_err();
    assert!(matches!(err, RotundaError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn rate_limit_hint_is_surfaced() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/chains/AAPL");
            then.status(429).header("retry-after", "42");
        })
        .await;

    let err = connector(&server)
        .chain_page(&ChainQuery::for_underlying("AAPL"), PageRequest::first(100))
        .await
        .unwrap_err();
    assert_eq!(
        err.retry_after_hint(),
        Some(std::time::Duration::from_secs(42))
    );
}

#[tokio::test]
async fn status_endpoint_backs_the_availability_probe() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/status");
            then.status(200).body(r#"{"status":"ok"}"#);
        })
        .await;
    assert!(connector(&server).is_available().await);
}
