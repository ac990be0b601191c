//! Fetch congressional trades from the CI-safe mock source and show the
//! cache at work.
//!
//! Run with: `cargo run --example 01_congress_trades`

use std::sync::Arc;

use rotunda::{FetchOptions, Rotunda};
use rotunda_mock::MockConnector;
use rotunda_types::TradeQuery;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let engine = Rotunda::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()?;

    let query = TradeQuery::unfiltered();
    let result = engine.trades(&query, FetchOptions::default()).await?;
    println!(
        "{} trades via {} (partial: {})",
        result.len(),
        result.source,
        result.partial
    );
    for record in &result.records {
        println!(
            "  {:<18} {:<5} {:<8} {} -> {}",
            record.politician.name,
            record.ticker,
            record.transaction.as_str(),
            record.trade_date,
            record.disclosure_date,
        );
    }

    // The second call is answered from the freshness cache.
    let again = engine.trades(&query, FetchOptions::default()).await?;
    println!("second call served from: {:?}", again.served);
    println!("cache: {:?}", engine.cache_status());
    Ok(())
}
