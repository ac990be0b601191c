use std::sync::Arc;
use std::time::Duration;

use rotunda::{FetchOptions, Rotunda, ServedFrom};
use rotunda_mock::DynamicMockConnector;
use rotunda_types::{TradePage, TradeQuery};

fn slow_source(delay_ms: u64) -> Arc<DynamicMockConnector> {
    Arc::new(
        DynamicMockConnector::named("slow")
            .with_delay(Duration::from_millis(delay_ms))
            .with_trades(|_q, _p| Ok(TradePage::default())),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_identical_misses_collapse_to_one_fetch() {
    let source = slow_source(50);
    let engine = Arc::new(
        Rotunda::builder()
            .with_connector(source.clone())
            .build()
            .unwrap(),
    );

    let tasks: Vec<_> = (0..5)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .trades(&TradeQuery::unfiltered(), FetchOptions::default())
                    .await
                    .unwrap()
            })
        })
        .collect();

    let results = futures::future::join_all(tasks).await;
    assert_eq!(source.trades_calls(), 1, "thundering herd must collapse");

    let mut upstream = 0;
    for result in results {
        let result = result.unwrap();
        if result.served == ServedFrom::Upstream {
            upstream += 1;
        } else {
            assert_eq!(result.served, ServedFrom::Cache);
        }
    }
    assert_eq!(upstream, 1, "exactly one caller performed the fetch");
}

#[tokio::test(flavor = "multi_thread")]
async fn distinct_queries_do_not_collapse() {
    let source = slow_source(10);
    let engine = Arc::new(
        Rotunda::builder()
            .with_connector(source.clone())
            .build()
            .unwrap(),
    );

    let aapl = TradeQuery {
        tickers: vec!["AAPL".into()],
        ..TradeQuery::unfiltered()
    };
    let msft = TradeQuery {
        tickers: vec!["MSFT".into()],
        ..TradeQuery::unfiltered()
    };
    let (a, b) = tokio::join!(
        engine.trades(&aapl, FetchOptions::default()),
        engine.trades(&msft, FetchOptions::default()),
    );
    a.unwrap();
    b.unwrap();
    assert_eq!(source.trades_calls(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn worker_pool_bounds_concurrent_upstream_fetches() {
    let source = slow_source(50);
    let engine = Arc::new(
        Rotunda::builder()
            .with_connector(source.clone())
            .max_concurrent_fetches(1)
            .build()
            .unwrap(),
    );

    let queries: Vec<TradeQuery> = ["AAPL", "MSFT"]
        .iter()
        .map(|t| TradeQuery {
            tickers: vec![(*t).to_string()],
            ..TradeQuery::unfiltered()
        })
        .collect();

    let started = std::time::Instant::now();
    let (a, b) = tokio::join!(
        engine.trades(&queries[0], FetchOptions::default()),
        engine.trades(&queries[1], FetchOptions::default()),
    );
    a.unwrap();
    b.unwrap();
    assert!(
        started.elapsed() >= Duration::from_millis(100),
        "a single worker must serialize the two fetches"
    );
}
