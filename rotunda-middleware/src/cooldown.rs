//! Cooldown wrapper: a source that exhausted its quota sits out until the
//! budget can plausibly answer again, so the orchestrator skips it instead of
//! burning its per-source timeout.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rotunda_core::connector::{
    CompanyNameProvider, OptionChainProvider, SourceConnector, TradeFeedProvider,
};
use rotunda_core::{Middleware, RotundaError, rotunda_connector_accessors};
use rotunda_types::{
    ChainPage, ChainQuery, CooldownConfig, DataCategory, PageRequest, TradePage, TradeQuery,
};

/// Wrapper that fails fast (and reports unavailable) for a window after quota
/// exhaustion.
pub struct CooldownConnector {
    inner: Arc<dyn SourceConnector>,
    cfg: CooldownConfig,
    until: Mutex<Option<Instant>>,
}

impl CooldownConnector {
    /// Wrap `inner` with the given cooldown configuration.
    #[must_use]
    pub fn new(inner: Arc<dyn SourceConnector>, cfg: CooldownConfig) -> Self {
        Self {
            inner,
            cfg,
            until: Mutex::new(None),
        }
    }

    fn cooling_remaining(&self) -> Option<Duration> {
        let mut guard = self.until.lock().expect("mutex poisoned");
        if let Some(until) = *guard {
            let now = Instant::now();
            if now < until {
                return Some(until - now);
            }
            *guard = None;
        }
        None
    }

    fn trip(&self, duration: Duration) {
        let mut guard = self.until.lock().expect("mutex poisoned");
        *guard = Some(Instant::now() + duration.max(Duration::from_millis(1)));
    }

    fn note_failure(&self, err: &RotundaError) {
        match err {
            RotundaError::QuotaExhausted { reset_in } => {
                tracing::warn!(source = self.inner.name(), "quota exhausted, cooling down");
                self.trip(*reset_in);
            }
            RotundaError::RetryExhausted { last, .. }
                if matches!(**last, RotundaError::RateLimited { .. }) =>
            {
                let duration = last.retry_after_hint().unwrap_or(self.cfg.default_duration);
                tracing::warn!(source = self.inner.name(), "rate limited, cooling down");
                self.trip(duration);
            }
            _ => {}
        }
    }

    fn guard(&self) -> Result<(), RotundaError> {
        match self.cooling_remaining() {
            Some(reset_in) => Err(RotundaError::CoolingDown { reset_in }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SourceConnector for CooldownConnector {
    fn name(&self) -> &'static str {
        self.inner.name()
    }
    fn vendor(&self) -> &'static str {
        self.inner.vendor()
    }
    fn supports(&self, category: DataCategory) -> bool {
        self.inner.supports(category)
    }
    async fn is_available(&self) -> bool {
        if self.cooling_remaining().is_some() {
            return false;
        }
        self.inner.is_available().await
    }
    rotunda_connector_accessors!(inner);
}

#[async_trait]
impl TradeFeedProvider for CooldownConnector {
    async fn trades_page(
        &self,
        query: &TradeQuery,
        page: PageRequest,
    ) -> Result<TradePage, RotundaError> {
        self.guard()?;
        let inner = self
            .inner
            .as_trade_feed_provider()
            .ok_or_else(|| RotundaError::unsupported("trades"))?;
        inner.trades_page(query, page).await.inspect_err(|e| {
            self.note_failure(e);
        })
    }

    fn max_page_size(&self) -> usize {
        self.inner
            .as_trade_feed_provider()
            .map_or(100, TradeFeedProvider::max_page_size)
    }
}

#[async_trait]
impl OptionChainProvider for CooldownConnector {
    async fn chain_page(
        &self,
        query: &ChainQuery,
        page: PageRequest,
    ) -> Result<ChainPage, RotundaError> {
        self.guard()?;
        let inner = self
            .inner
            .as_option_chain_provider()
            .ok_or_else(|| RotundaError::unsupported("option-chain"))?;
        inner.chain_page(query, page).await.inspect_err(|e| {
            self.note_failure(e);
        })
    }

    fn max_page_size(&self) -> usize {
        self.inner
            .as_option_chain_provider()
            .map_or(100, OptionChainProvider::max_page_size)
    }
}

#[async_trait]
impl CompanyNameProvider for CooldownConnector {
    async fn company_name(&self, ticker: &str) -> Result<Option<String>, RotundaError> {
        self.guard()?;
        let inner = self
            .inner
            .as_company_name_provider()
            .ok_or_else(|| RotundaError::unsupported("company-name"))?;
        inner.company_name(ticker).await.inspect_err(|e| {
            self.note_failure(e);
        })
    }
}

/// Declarative layer for constructing a [`CooldownConnector`] through the
/// builder.
pub struct CooldownMiddleware {
    config: CooldownConfig,
}

impl CooldownMiddleware {
    /// Capture the cooldown configuration.
    #[must_use]
    pub const fn new(config: CooldownConfig) -> Self {
        Self { config }
    }
}

impl Middleware for CooldownMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn SourceConnector>) -> Arc<dyn SourceConnector> {
        Arc::new(CooldownConnector::new(inner, self.config))
    }

    fn name(&self) -> &'static str {
        "CooldownConnector"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "default_duration_ms": self.config.default_duration.as_millis(),
        })
    }
}
