use std::sync::Arc;
use std::time::Duration;

use rotunda_core::RotundaError;
use rotunda_core::connector::SourceConnector;
use rotunda_middleware::ConnectorBuilder;
use rotunda_mock::DynamicMockConnector;
use rotunda_types::{
    CooldownConfig, PageRequest, RateLimitConfig, RetryConfig, TradePage, TradeQuery,
};

fn serving_source() -> Arc<DynamicMockConnector> {
    Arc::new(
        DynamicMockConnector::named("serving")
            .with_trades(|_q, _p| Ok(TradePage::default())),
    )
}

#[tokio::test]
async fn empty_builder_passes_through() {
    let raw = serving_source();
    let built = ConnectorBuilder::new(raw.clone()).build();
    assert_eq!(built.name(), "serving");
    built
        .as_trade_feed_provider()
        .unwrap()
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(10))
        .await
        .unwrap();
    assert_eq!(raw.trades_calls(), 1);
}

#[test]
fn layers_are_described_outermost_first() {
    let builder = ConnectorBuilder::new(serving_source())
        .with_rate_limit(&RateLimitConfig::default())
        .with_retry(RetryConfig::default())
        .with_cooldown(CooldownConfig::default());
    let names: Vec<String> = builder.describe().into_iter().map(|(n, _)| n).collect();
    assert_eq!(
        names,
        vec![
            "CooldownConnector".to_string(),
            "RetryingConnector".to_string(),
            "RateLimitedConnector".to_string(),
            "RawConnector".to_string(),
        ]
    );
}

#[test]
fn re_adding_a_layer_replaces_it() {
    let builder = ConnectorBuilder::new(serving_source())
        .with_retry(RetryConfig {
            max_attempts: 2,
            ..RetryConfig::default()
        })
        .with_retry(RetryConfig {
            max_attempts: 7,
            ..RetryConfig::default()
        });
    let described = builder.describe();
    let retries: Vec<_> = described
        .iter()
        .filter(|(n, _)| n == "RetryingConnector")
        .collect();
    assert_eq!(retries.len(), 1);
    assert_eq!(retries[0].1["max_attempts"], 7);
}

#[tokio::test]
async fn daily_cap_exhaustion_propagates_through_the_stack_and_trips_cooldown() {
    let raw = serving_source();
    let built = ConnectorBuilder::new(raw.clone())
        .with_rate_limit(&RateLimitConfig {
            max_calls: 10,
            window: Duration::from_secs(60),
            daily_cap: Some(1),
        })
        .with_retry(RetryConfig::default())
        .with_cooldown(CooldownConfig::default())
        .build();
    let provider = built.as_trade_feed_provider().unwrap();

    provider
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(10))
        .await
        .unwrap();
    assert_eq!(raw.trades_calls(), 1);

    let err = provider
        .trades_page(&TradeQuery::unfiltered(), PageRequest::first(10))
        .await
        .unwrap_err();
    assert!(
        matches!(err, RotundaError::QuotaExhausted { .. }),
        "got {err:?}"
    );
    assert_eq!(raw.trades_calls(), 1, "the capped call never hit the wire");
    // The cooldown layer observed the exhaustion and now reports unavailable.
    assert!(!built.is_available().await);
}
