use httpmock::prelude::*;
use rotunda_capitoltrades::CapitolHtmlConnector;
use rotunda_core::RotundaError;
use rotunda_core::connector::{SourceConnector, TradeFeedProvider};
use rotunda_types::{PageRequest, PageToken, TradeQuery};

fn document() -> String {
    let payload = r#"{
      "props": { "pageProps": { "trades": [
        {
          "politician": { "firstName": "Nancy", "lastName": "Pelosi", "party": "democrat", "chamber": "house", "state": "CA" },
          "asset": { "assetTicker": "MSFT:US", "instrument": "Microsoft Corp" },
          "txType": "buy", "txDate": "2025-05-09", "pubDate": "2025-05-23",
          "size": "1K–15K", "owner": "joint"
        }
      ] } }
    }"#;
    format!(
        "<!doctype html><html><head><title>Trades</title></head><body>\
         <div id=\"app\">rendered by javascript</div>\
         <script id=\"__NEXT_DATA__\" type=\"application/json\">{payload}</script>\
         </body></html>"
    )
}

fn connector(server: &MockServer) -> CapitolHtmlConnector {
    CapitolHtmlConnector::with_page_url(&server.url("/trades")).unwrap()
}

#[tokio::test]
async fn embedded_payload_is_extracted_and_normalized() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/trades");
            then.status(200)
                .header("content-type", "text/html")
                .body(document());
        })
        .await;

    let page = connector(&server)
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(50))
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].ticker, "MSFT");
    assert_eq!(page.records[0].size_bracket.as_deref(), Some("1K–15K"));
    assert!(page.next.is_none(), "single document, no continuation");
}

#[tokio::test]
async fn missing_embedded_payload_is_a_parse_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/trades");
            then.status(200)
                .header("content-type", "text/html")
                .body("<html><body>javascript required</body></html>");
        })
        .await;

    let err = connector(&server)
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(50))
        .await
        .unwrap_err();
    assert!(matches!(err, RotundaError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn continuation_requests_return_an_empty_page_without_a_fetch() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/trades");
            then.status(200).body(document());
        })
        .await;

    let page = connector(&server)
        .trades_page(
            &TradeQuery::unfiltered(),
            PageRequest::resume(PageToken::Offset(2), 50),
        )
        .await
        .unwrap();
    assert!(page.records.is_empty());
    mock.assert_hits_async(0).await;
}
