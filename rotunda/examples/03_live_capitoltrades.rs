//! Fetch live disclosures from Capitol Trades with the HTML document as the
//! primary source and the BFF API as backup, enriching company names through
//! the ticker directory.
//!
//! Network-dependent; expect failures when the upstreams are unreachable.
//!
//! Run with: `cargo run --example 03_live_capitoltrades`

use std::sync::Arc;

use rotunda::{FetchOptions, Rotunda, TickerDirectory};
use rotunda_capitoltrades::{CapitolBffConnector, CapitolHtmlConnector};
use rotunda_types::TradeQuery;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rotunda=debug,info")),
        )
        .init();

    let engine = Rotunda::builder()
        .with_connector(CapitolHtmlConnector::rate_limited().build())
        .with_connector(CapitolBffConnector::rate_limited().build())
        .with_name_lookup(Arc::new(TickerDirectory::new()))
        .build()?;

    match engine.trades(&TradeQuery::unfiltered(), FetchOptions::default()).await {
        Ok(result) => {
            println!("{} trades via {}", result.len(), result.source);
            for record in result.records.iter().take(10) {
                println!(
                    "  {:<22} {:<6} {:<8} {} ({})",
                    record.politician.name,
                    record.ticker,
                    record.transaction.as_str(),
                    record.trade_date,
                    record.company.as_deref().unwrap_or("unknown company"),
                );
            }
        }
        Err(err) => {
            eprintln!("every source failed:");
            for reason in err.flatten() {
                eprintln!("  - {reason}");
            }
        }
    }
    Ok(())
}
