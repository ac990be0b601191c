use std::sync::Arc;
use std::time::Duration;

use rotunda_core::RotundaError;
use rotunda_core::connector::SourceConnector;
use rotunda_middleware::CooldownConnector;
use rotunda_mock::DynamicMockConnector;
use rotunda_types::{CooldownConfig, PageRequest, TradeQuery};

fn quota_exhausted_source() -> Arc<DynamicMockConnector> {
    Arc::new(
        DynamicMockConnector::named("exhausted").with_trades(|_q, _p| {
            Err(RotundaError::QuotaExhausted {
                reset_in: Duration::from_millis(50),
            })
        }),
    )
}

#[tokio::test]
async fn quota_exhaustion_trips_the_cooldown() {
    let wrapped = CooldownConnector::new(quota_exhausted_source(), CooldownConfig::default());
    let provider = wrapped.as_trade_feed_provider().unwrap();

    let first = provider
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(10))
        .await
        .unwrap_err();
    assert!(matches!(first, RotundaError::QuotaExhausted { .. }));

    // While cooling the wrapper fails fast and reports unavailable.
    let second = provider
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(10))
        .await
        .unwrap_err();
    assert!(matches!(second, RotundaError::CoolingDown { .. }));
    assert!(!wrapped.is_available().await);
}

#[tokio::test]
async fn cooldown_expires_after_the_reset_hint() {
    let source = quota_exhausted_source();
    let wrapped = CooldownConnector::new(source.clone(), CooldownConfig::default());
    let provider = wrapped.as_trade_feed_provider().unwrap();

    let _ = provider
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(10))
        .await;
    assert_eq!(source.trades_calls(), 1);
    let _ = provider
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(10))
        .await;
    assert_eq!(source.trades_calls(), 1, "cooling calls never reach the inner");

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(wrapped.is_available().await);
    let _ = provider
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(10))
        .await;
    assert_eq!(source.trades_calls(), 2);
}

#[tokio::test]
async fn ordinary_failures_do_not_trip_the_cooldown() {
    let source = Arc::new(
        DynamicMockConnector::named("flaky")
            .with_trades(|_q, _p| Err(RotundaError::UpstreamServer { status: 500 })),
    );
    let wrapped = CooldownConnector::new(source, CooldownConfig::default());
    let provider = wrapped.as_trade_feed_provider().unwrap();

    for _ in 0..2 {
        let err = provider
            .trades_page(&TradeQuery::unfiltered(), PageRequest::first(10))
            .await
            .unwrap_err();
        assert!(matches!(err, RotundaError::UpstreamServer { .. }));
    }
    assert!(wrapped.is_available().await);
}
