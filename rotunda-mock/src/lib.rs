#![doc = include_str!("../README.md")]

use async_trait::async_trait;
use rotunda_core::RotundaError;
use rotunda_core::connector::{
    CompanyNameProvider, OptionChainProvider, SourceConnector, TradeFeedProvider,
};
use rotunda_types::{ChainPage, ChainQuery, DataCategory, PageRequest, TradePage, TradeQuery};

mod dynamic;
mod fixtures;

pub use dynamic::DynamicMockConnector;

/// Mock connector for CI-safe tests and examples. Serves deterministic data
/// from static fixtures.
///
/// Trigger symbols: a query whose ticker set contains `"FAIL"` fails with a
/// server error, `"RATELIMIT"` fails with an upstream rate-limit signal.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Build the fixture connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn maybe_fail(tickers: &[String]) -> Result<(), RotundaError> {
        if tickers.iter().any(|t| t == "FAIL") {
            return Err(RotundaError::UpstreamServer { status: 500 });
        }
        if tickers.iter().any(|t| t == "RATELIMIT") {
            return Err(RotundaError::RateLimited { retry_after: None });
        }
        Ok(())
    }
}

#[async_trait]
impl SourceConnector for MockConnector {
    fn name(&self) -> &'static str {
        "rotunda-mock"
    }
    fn vendor(&self) -> &'static str {
        "Mock"
    }
    fn supports(&self, _category: DataCategory) -> bool {
        true
    }
    fn as_trade_feed_provider(&self) -> Option<&dyn TradeFeedProvider> {
        Some(self as &dyn TradeFeedProvider)
    }
    fn as_option_chain_provider(&self) -> Option<&dyn OptionChainProvider> {
        Some(self as &dyn OptionChainProvider)
    }
    fn as_company_name_provider(&self) -> Option<&dyn CompanyNameProvider> {
        Some(self as &dyn CompanyNameProvider)
    }
}

#[async_trait]
impl TradeFeedProvider for MockConnector {
    async fn trades_page(
        &self,
        query: &TradeQuery,
        page: PageRequest,
    ) -> Result<TradePage, RotundaError> {
        Self::maybe_fail(&query.tickers)?;
        let mut records = fixtures::trades::matching(query);
        records.truncate(page.limit);
        Ok(TradePage {
            records,
            next: None,
        })
    }
}

#[async_trait]
impl OptionChainProvider for MockConnector {
    async fn chain_page(
        &self,
        query: &ChainQuery,
        page: PageRequest,
    ) -> Result<ChainPage, RotundaError> {
        if query.underlying == "FAIL" {
            return Err(RotundaError::UpstreamServer { status: 500 });
        }
        let mut records = fixtures::chain::for_underlying(&query.underlying.to_ascii_uppercase());
        if let Some(side) = query.contract_type {
            records.retain(|c| c.contract_type == side);
        }
        if let Some(expiry) = query.expiry {
            records.retain(|c| c.expiry == expiry);
        }
        records.truncate(page.limit);
        Ok(ChainPage {
            records,
            next: None,
        })
    }
}

#[async_trait]
impl CompanyNameProvider for MockConnector {
    async fn company_name(&self, ticker: &str) -> Result<Option<String>, RotundaError> {
        let name = match ticker.to_ascii_uppercase().as_str() {
            "AAPL" => Some("Apple Inc."),
            "MSFT" => Some("Microsoft Corp"),
            "NVDA" => Some("NVIDIA Corp"),
            "GOOGL" => Some("Alphabet Inc."),
            "KO" => Some("Coca-Cola"),
            _ => None,
        };
        Ok(name.map(str::to_string))
    }
}
