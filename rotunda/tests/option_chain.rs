use std::sync::Arc;

use rotunda::{FetchOptions, Rotunda, ServedFrom};
use rotunda_mock::MockConnector;
use rotunda_types::{ChainQuery, ContractType, DataCategory};

#[tokio::test]
async fn chain_snapshots_flow_through_the_same_cache_path() {
    let engine = Rotunda::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap();

    let query = ChainQuery::for_underlying("AAPL");
    let first = engine.option_chain(&query, FetchOptions::default()).await.unwrap();
    assert_eq!(first.served, ServedFrom::Upstream);
    assert_eq!(first.len(), 4);
    assert!(first.records.iter().all(|c| c.underlying == "AAPL"));

    let second = engine.option_chain(&query, FetchOptions::default()).await.unwrap();
    assert_eq!(second.served, ServedFrom::Cache);

    // Trades and chains are cached under distinct fingerprints.
    assert_eq!(engine.cache_status().entries, 1);
}

#[tokio::test]
async fn contract_side_filter_narrows_the_chain() {
    let engine = Rotunda::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap();

    let query = ChainQuery {
        underlying: "AAPL".to_string(),
        expiry: None,
        contract_type: Some(ContractType::Put),
    };
    let result = engine.option_chain(&query, FetchOptions::default()).await.unwrap();
    assert!(!result.is_empty());
    assert!(
        result
            .records
            .iter()
            .all(|c| c.contract_type == ContractType::Put)
    );
}

#[tokio::test]
async fn unknown_underlying_is_an_empty_success() {
    let engine = Rotunda::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap();

    let result = engine
        .option_chain(&ChainQuery::for_underlying("NOPE"), FetchOptions::default())
        .await
        .unwrap();
    assert!(result.is_empty());
    assert!(!result.partial);
}

#[tokio::test]
async fn mock_supports_both_categories() {
    use rotunda_core::connector::SourceConnector;
    let mock = MockConnector::new();
    assert!(mock.supports(DataCategory::Trades));
    assert!(mock.supports(DataCategory::OptionChain));
}
