//! Fetch an options chain from the mock source and export it as CSV.
//!
//! Run with: `cargo run --example 02_option_chain`

use std::sync::Arc;

use rotunda::{DataRequest, FetchOptions, Rotunda};
use rotunda_mock::MockConnector;
use rotunda_types::ChainQuery;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let engine = Rotunda::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()?;

    let request = DataRequest::OptionChain(ChainQuery::for_underlying("AAPL"));
    let response = engine.get_data(&request, FetchOptions::default()).await?;
    print!("{}", response.to_csv_string());
    Ok(())
}
