use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rotunda_core::RotundaError;
use rotunda_core::connector::{
    CompanyNameProvider, OptionChainProvider, SourceConnector, TradeFeedProvider,
};
use rotunda_types::{
    ChainPage, ChainQuery, DataCategory, PageRequest, PageToken, TradePage, TradeQuery,
    TradeRecord,
};

type TradesFn =
    dyn Fn(&TradeQuery, PageRequest) -> Result<TradePage, RotundaError> + Send + Sync;
type ChainFn = dyn Fn(&ChainQuery, PageRequest) -> Result<ChainPage, RotundaError> + Send + Sync;
type NameFn = dyn Fn(&str) -> Result<Option<String>, RotundaError> + Send + Sync;

/// Scriptable in-memory connector used by integration tests.
///
/// Capabilities are advertised only for the behaviors a test installs, so the
/// same type can play a trades-only source, a chain-only source, or both.
/// Every role call is counted, which is how tests assert "source C was never
/// invoked" and "two identical requests collapsed to one fetch".
pub struct DynamicMockConnector {
    name: &'static str,
    available: AtomicBool,
    delay: Option<Duration>,
    trades_calls: AtomicUsize,
    chain_calls: AtomicUsize,
    name_calls: AtomicUsize,
    trades_fn: Option<Arc<TradesFn>>,
    chain_fn: Option<Arc<ChainFn>>,
    name_fn: Option<Arc<NameFn>>,
}

impl DynamicMockConnector {
    /// A connector with the given static name and no capabilities.
    #[must_use]
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            available: AtomicBool::new(true),
            delay: None,
            trades_calls: AtomicUsize::new(0),
            chain_calls: AtomicUsize::new(0),
            name_calls: AtomicUsize::new(0),
            trades_fn: None,
            chain_fn: None,
            name_fn: None,
        }
    }

    /// Install a scripted trade-feed behavior.
    #[must_use]
    pub fn with_trades<F>(mut self, f: F) -> Self
    where
        F: Fn(&TradeQuery, PageRequest) -> Result<TradePage, RotundaError>
            + Send
            + Sync
            + 'static,
    {
        self.trades_fn = Some(Arc::new(f));
        self
    }

    /// Serve trades from fixed pages with offset continuation; the common
    /// pagination script.
    #[must_use]
    pub fn with_trade_pages(self, pages: Vec<Vec<TradeRecord>>) -> Self {
        self.with_trades(move |_query, page| {
            let idx = match page.token {
                None => 0,
                Some(PageToken::Offset(n)) => n as usize,
                Some(PageToken::Cursor(_)) => {
                    return Err(RotundaError::invalid_arg("offset upstream got a cursor"));
                }
            };
            let records = pages.get(idx).cloned().unwrap_or_default();
            let next = (idx + 1 < pages.len()).then(|| PageToken::Offset(idx as u32 + 1));
            Ok(TradePage { records, next })
        })
    }

    /// Install a scripted option-chain behavior.
    #[must_use]
    pub fn with_chain<F>(mut self, f: F) -> Self
    where
        F: Fn(&ChainQuery, PageRequest) -> Result<ChainPage, RotundaError>
            + Send
            + Sync
            + 'static,
    {
        self.chain_fn = Some(Arc::new(f));
        self
    }

    /// Install a scripted company-name behavior.
    #[must_use]
    pub fn with_company_names<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Option<String>, RotundaError> + Send + Sync + 'static,
    {
        self.name_fn = Some(Arc::new(f));
        self
    }

    /// Seed the availability probe result.
    #[must_use]
    pub fn available(self, yes: bool) -> Self {
        self.available.store(yes, Ordering::SeqCst);
        self
    }

    /// Add artificial latency to every role call.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Flip availability at runtime.
    pub fn set_available(&self, yes: bool) {
        self.available.store(yes, Ordering::SeqCst);
    }

    /// Number of trade-feed page calls served so far.
    #[must_use]
    pub fn trades_calls(&self) -> usize {
        self.trades_calls.load(Ordering::SeqCst)
    }

    /// Number of chain page calls served so far.
    #[must_use]
    pub fn chain_calls(&self) -> usize {
        self.chain_calls.load(Ordering::SeqCst)
    }

    /// Number of company-name lookups served so far.
    #[must_use]
    pub fn name_calls(&self) -> usize {
        self.name_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl SourceConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }
    fn vendor(&self) -> &'static str {
        "Mock"
    }
    fn supports(&self, category: DataCategory) -> bool {
        match category {
            DataCategory::Trades => self.trades_fn.is_some(),
            DataCategory::OptionChain => self.chain_fn.is_some(),
            _ => false,
        }
    }
    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
    fn as_trade_feed_provider(&self) -> Option<&dyn TradeFeedProvider> {
        self.trades_fn
            .is_some()
            .then_some(self as &dyn TradeFeedProvider)
    }
    fn as_option_chain_provider(&self) -> Option<&dyn OptionChainProvider> {
        self.chain_fn
            .is_some()
            .then_some(self as &dyn OptionChainProvider)
    }
    fn as_company_name_provider(&self) -> Option<&dyn CompanyNameProvider> {
        self.name_fn
            .is_some()
            .then_some(self as &dyn CompanyNameProvider)
    }
}

#[async_trait]
impl TradeFeedProvider for DynamicMockConnector {
    async fn trades_page(
        &self,
        query: &TradeQuery,
        page: PageRequest,
    ) -> Result<TradePage, RotundaError> {
        self.trades_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        let f = self
            .trades_fn
            .as_ref()
            .ok_or_else(|| RotundaError::unsupported("trades"))?;
        f(query, page)
    }
}

#[async_trait]
impl OptionChainProvider for DynamicMockConnector {
    async fn chain_page(
        &self,
        query: &ChainQuery,
        page: PageRequest,
    ) -> Result<ChainPage, RotundaError> {
        self.chain_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        let f = self
            .chain_fn
            .as_ref()
            .ok_or_else(|| RotundaError::unsupported("option-chain"))?;
        f(query, page)
    }
}

#[async_trait]
impl CompanyNameProvider for DynamicMockConnector {
    async fn company_name(&self, ticker: &str) -> Result<Option<String>, RotundaError> {
        self.name_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        let f = self
            .name_fn
            .as_ref()
            .ok_or_else(|| RotundaError::unsupported("company-name"))?;
        f(ticker)
    }
}
