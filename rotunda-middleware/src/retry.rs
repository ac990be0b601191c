//! Classified retry with exponential backoff and jitter.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use rotunda_core::connector::{
    CompanyNameProvider, OptionChainProvider, SourceConnector, TradeFeedProvider,
};
use rotunda_core::{Middleware, RotundaError, rotunda_connector_accessors};
use rotunda_types::{
    ChainPage, ChainQuery, DataCategory, PageRequest, RetryConfig, TradePage, TradeQuery,
};
use std::time::Duration;

/// Retry driver around a single upstream call.
///
/// Classification comes from [`RotundaError::is_retryable`]: transport
/// failures, upstream rate limiting, and 5xx responses are re-attempted;
/// client errors and parse failures surface on first occurrence. The backoff
/// decision itself is the pure [`RetryPolicy::backoff_for`], so behavior is
/// testable without timers.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    cfg: RetryConfig,
}

impl RetryPolicy {
    /// Build a policy.
    #[must_use]
    pub const fn new(cfg: RetryConfig) -> Self {
        Self { cfg }
    }

    /// Wait before re-attempting after `err` on zero-based `attempt`, or
    /// `None` when the call must not be retried.
    ///
    /// The wait is the upstream's `Retry-After` hint when present, else
    /// `backoff_base * 2^attempt` capped at `max_backoff` plus uniform jitter
    /// in `[0, backoff_base)`.
    #[must_use]
    pub fn backoff_for(&self, attempt: u32, err: &RotundaError) -> Option<Duration> {
        if attempt + 1 >= self.cfg.max_attempts || !err.is_retryable() {
            return None;
        }
        if let Some(hint) = err.retry_after_hint() {
            return Some(hint);
        }
        let exp = self
            .cfg
            .backoff_base
            .saturating_mul(1u32 << attempt.min(16))
            .min(self.cfg.max_backoff);
        let jitter_ceiling = u64::try_from(self.cfg.backoff_base.as_millis())
            .unwrap_or(u64::MAX)
            .max(1);
        let jitter = rand::rng().random_range(0..jitter_ceiling);
        Some(exp + Duration::from_millis(jitter))
    }

    /// Invoke `op` up to the configured attempt ceiling.
    ///
    /// # Errors
    /// A fatal classification is returned unchanged after a single attempt; a
    /// retryable failure that survives every attempt is wrapped in
    /// [`RotundaError::RetryExhausted`] carrying the last underlying error.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, RotundaError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RotundaError>>,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => match self.backoff_for(attempt, &err) {
                    Some(wait) => {
                        attempt += 1;
                        tracing::debug!(
                            attempt,
                            wait_ms = wait.as_millis() as u64,
                            error = %err,
                            "retrying upstream call"
                        );
                        tokio::time::sleep(wait).await;
                    }
                    None => {
                        let attempts = attempt + 1;
                        return Err(if err.is_retryable() {
                            RotundaError::RetryExhausted {
                                attempts,
                                last: Box::new(err),
                            }
                        } else {
                            err
                        });
                    }
                },
            }
        }
    }
}

/// Wrapper that re-attempts transient failures of the inner connector.
pub struct RetryingConnector {
    inner: Arc<dyn SourceConnector>,
    policy: RetryPolicy,
}

impl RetryingConnector {
    /// Wrap `inner` with the given retry configuration.
    #[must_use]
    pub const fn new(inner: Arc<dyn SourceConnector>, cfg: RetryConfig) -> Self {
        Self {
            inner,
            policy: RetryPolicy::new(cfg),
        }
    }
}

#[async_trait]
impl SourceConnector for RetryingConnector {
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
        self.inner.is_available().await
    }
    rotunda_connector_accessors!(inner);
}

#[async_trait]
impl TradeFeedProvider for RetryingConnector {
    async fn trades_page(
        &self,
        query: &TradeQuery,
        page: PageRequest,
    ) -> Result<TradePage, RotundaError> {
        let inner = self
            .inner
            .as_trade_feed_provider()
            .ok_or_else(|| RotundaError::unsupported("trades"))?;
        self.policy
            .run(|| inner.trades_page(query, page.clone()))
            .await
    }

    fn max_page_size(&self) -> usize {
        self.inner
            .as_trade_feed_provider()
            .map_or(100, TradeFeedProvider::max_page_size)
    }
}

#[async_trait]
impl OptionChainProvider for RetryingConnector {
    async fn chain_page(
        &self,
        query: &ChainQuery,
        page: PageRequest,
    ) -> Result<ChainPage, RotundaError> {
        let inner = self
            .inner
            .as_option_chain_provider()
            .ok_or_else(|| RotundaError::unsupported("option-chain"))?;
        self.policy
            .run(|| inner.chain_page(query, page.clone()))
            .await
    }

    fn max_page_size(&self) -> usize {
        self.inner
            .as_option_chain_provider()
            .map_or(100, OptionChainProvider::max_page_size)
    }
}

#[async_trait]
impl CompanyNameProvider for RetryingConnector {
    async fn company_name(&self, ticker: &str) -> Result<Option<String>, RotundaError> {
        let inner = self
            .inner
            .as_company_name_provider()
            .ok_or_else(|| RotundaError::unsupported("company-name"))?;
        self.policy.run(|| inner.company_name(ticker)).await
    }
}

/// Declarative layer for constructing a [`RetryingConnector`] through the
/// builder.
pub struct RetryMiddleware {
    config: RetryConfig,
}

impl RetryMiddleware {
    /// Capture the retry configuration.
    #[must_use]
    pub const fn new(config: RetryConfig) -> Self {
        Self { config }
    }
}

impl Middleware for RetryMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn SourceConnector>) -> Arc<dyn SourceConnector> {
        Arc::new(RetryingConnector::new(inner, self.config))
    }

    fn name(&self) -> &'static str {
        "RetryingConnector"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "max_attempts": self.config.max_attempts,
            "backoff_base_ms": self.config.backoff_base.as_millis(),
            "max_backoff_ms": self.config.max_backoff.as_millis(),
        })
    }
}
