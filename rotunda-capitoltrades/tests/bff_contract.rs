use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use rotunda_capitoltrades::CapitolBffConnector;
use rotunda_core::RotundaError;
use rotunda_core::connector::{SourceConnector, TradeFeedProvider};
use rotunda_middleware::RetryingConnector;
use rotunda_types::{
    Chamber, PageRequest, PageToken, Party, RetryConfig, TradeQuery, TransactionType,
};

const PAGE_ONE: &str = r#"{
  "meta": { "paging": { "page": 1, "pageSize": 2, "totalItems": 3, "totalPages": 2 } },
  "data": [
    {
      "politician": { "firstName": "Nancy", "lastName": "Pelosi", "party": "democrat", "chamber": "house", "state": "CA" },
      "asset": { "assetTicker": "AAPL:US", "instrument": "Apple Inc.", "sector": "Technology" },
      "txType": "buy", "txDate": "2025-05-02", "pubDate": "2025-05-14",
      "size": "250K–500K", "price": 171.5, "owner": "spouse"
    },
    {
      "politician": { "firstName": "Tommy", "lastName": "Tuberville", "party": "republican", "chamber": "senate", "state": "AL" },
      "asset": { "assetTicker": "NVDA:US", "instrument": "NVIDIA Corp" },
      "txType": "sell", "txDate": "2025-05-06", "pubDate": "2025-05-20T00:00:00Z",
      "size": "15K–50K", "owner": "self"
    }
  ]
}"#;

const PAGE_TWO: &str = r#"{
  "meta": { "paging": { "page": 2, "pageSize": 2, "totalItems": 3, "totalPages": 2 } },
  "data": [
    {
      "politician": { "firstName": "Josh", "lastName": "Gottheimer", "party": "democrat", "chamber": "house", "state": "NJ" },
      "asset": { "instrument": "Municipal bond" },
      "txType": "buy", "txDate": "2025-05-09", "pubDate": "2025-05-23"
    }
  ]
}"#;

fn connector(server: &MockServer) -> CapitolBffConnector {
    CapitolBffConnector::with_base_url(&server.base_url()).unwrap()
}

#[tokio::test]
async fn first_page_is_parsed_and_normalized() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/trades")
                .query_param("page", "1")
                .query_param("pageSize", "2");
            then.status(200)
                .header("content-type", "application/json")
                .body(PAGE_ONE);
        })
        .await;

    let page = connector(&server)
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(2))
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(page.records.len(), 2);
    assert_eq!(page.next, Some(PageToken::Offset(2)));

    let first = &page.records[0];
    assert_eq!(first.ticker, "AAPL");
    assert_eq!(first.politician.name, "Nancy Pelosi");
    assert_eq!(first.politician.party, Party::Democrat);
    assert_eq!(first.transaction, TransactionType::Buy);
    assert_eq!(first.reporting_delay_days(), 12);
    assert_eq!(first.company.as_deref(), Some("Apple Inc."));

    let second = &page.records[1];
    assert_eq!(second.politician.chamber, Chamber::Senate);
    assert_eq!(second.transaction, TransactionType::Sell);
}

#[tokio::test]
async fn last_page_has_no_continuation_and_skips_tickerless_rows() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/trades").query_param("page", "2");
            then.status(200)
                .header("content-type", "application/json")
                .body(PAGE_TWO);
        })
        .await;

    let page = connector(&server)
        .trades_page(
            &TradeQuery::unfiltered(),
            PageRequest::resume(PageToken::Offset(2), 2),
        )
        .await
        .unwrap();
    assert!(page.records.is_empty(), "bond row has no identity key");
    assert_eq!(page.next, None);
}

#[tokio::test]
async fn filters_are_applied_client_side() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/trades");
            then.status(200)
                .header("content-type", "application/json")
                .body(PAGE_ONE);
        })
        .await;

    let query = TradeQuery {
        tickers: vec!["NVDA".into()],
        ..TradeQuery::unfiltered()
    };
    let page = connector(&server)
        .trades_page(&query, PageRequest::first(2))
        .await
        .unwrap();
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].ticker, "NVDA");
}

#[tokio::test]
async fn malformed_payload_is_fatal_and_never_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/trades");
            then.status(200)
                .header("content-type", "application/json")
                .body("<!doctype html><html>maintenance</html>");
        })
        .await;

    let wrapped = RetryingConnector::new(
        Arc::new(connector(&server)),
        RetryConfig {
            max_attempts: 4,
            backoff_base: Duration::from_millis(1),
            max_backoff: Duration::from_millis(10),
        },
    );
    let err = wrapped
        .as_trade_feed_provider()
        .unwrap()
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(2))
        .await
        .unwrap_err();
    assert!(matches!(err, RotundaError::Parse(_)), "got {err:?}");
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn http_statuses_map_onto_the_taxonomy() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/trades").query_param("page", "1");
            then.status(429).header("retry-after", "3");
        })
        .await;
    let err = connector(&server)
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(2))
        .await
        .unwrap_err();
    match err {
        RotundaError::RateLimited { retry_after } => {
            assert_eq!(retry_after, Some(Duration::from_secs(3)));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/trades");
            then.status(503);
        })
        .await;
    let err = connector(&server)
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(2))
        .await
        .unwrap_err();
    assert!(matches!(err, RotundaError::UpstreamServer { status: 503 }));

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/trades");
            then.status(400);
        })
        .await;
    let err = connector(&server)
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(2))
        .await
        .unwrap_err();
    assert!(matches!(err, RotundaError::UpstreamClient { status: 400 }));
}

#[tokio::test]
async fn availability_probe_reflects_reachability() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/trades");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"data":[]}"#);
        })
        .await;
    assert!(connector(&server).is_available().await);

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/trades");
            then.status(503);
        })
        .await;
    assert!(!connector(&server).is_available().await);
}
