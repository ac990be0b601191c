//! Sliding-window rate limiter and the quota-aware connector wrapper.
//!
//! Each wrapper owns its limiter state exclusively; two connectors never share
//! a budget even when they target the same provider account, so one category's
//! saturation cannot starve another.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rotunda_core::connector::{
    CompanyNameProvider, OptionChainProvider, SourceConnector, TradeFeedProvider,
};
use rotunda_core::{Middleware, RotundaError, rotunda_connector_accessors};
use rotunda_types::{
    ChainPage, ChainQuery, DataCategory, PageRequest, QuotaState, RateLimitConfig, TradePage,
    TradeQuery,
};
use tokio::time::Instant;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// FIFO admission gate enforcing `max_calls` per sliding `window` plus an
/// optional daily cap.
///
/// Admission instants are promised under the state lock and slept on outside
/// it: the k-th waiter is scheduled for the instant the k-th oldest in-window
/// admission leaves the window, so admission order follows arrival order while
/// the waits themselves run concurrently. A waiter dropped before its instant
/// arrives releases the reservation and never counts against the budget.
#[derive(Debug)]
pub struct RateLimiter {
    cfg: RateLimitConfig,
    state: Mutex<LimiterState>,
}

#[derive(Debug)]
struct LimiterState {
    /// Past and promised admission instants, ascending.
    admissions: VecDeque<Instant>,
    day_used: u32,
    day_start: Instant,
}

impl RateLimiter {
    /// Build a limiter with a full budget.
    #[must_use]
    pub fn new(cfg: RateLimitConfig) -> Self {
        Self {
            cfg,
            state: Mutex::new(LimiterState {
                admissions: VecDeque::new(),
                day_used: 0,
                day_start: Instant::now(),
            }),
        }
    }

    /// Wait for a call slot.
    ///
    /// Returns immediately when the window has capacity; otherwise suspends
    /// until the promised admission instant; never busy-polls.
    ///
    /// # Errors
    /// Fails fast with [`RotundaError::QuotaExhausted`] when the daily cap is
    /// spent, since waiting inside a request cannot help until rollover.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    pub async fn acquire(&self) -> Result<(), RotundaError> {
        let now = Instant::now();
        let target = {
            let mut s = self.state.lock().expect("mutex poisoned");

            if let Some(cap) = self.cfg.daily_cap {
                while now.duration_since(s.day_start) >= DAY {
                    s.day_start += DAY;
                    s.day_used = 0;
                }
                if s.day_used >= cap {
                    let reset_in = DAY.saturating_sub(now.duration_since(s.day_start));
                    return Err(RotundaError::QuotaExhausted { reset_in });
                }
                s.day_used += 1;
            }

            while let Some(&front) = s.admissions.front()
                && now.duration_since(front) >= self.cfg.window
            {
                s.admissions.pop_front();
            }

            let max = (self.cfg.max_calls as usize).max(1);
            let mut target = if s.admissions.len() < max {
                now
            } else {
                let pivot = s.admissions[s.admissions.len() - max];
                (pivot + self.cfg.window).max(now)
            };
            // Keep the deque ascending so later position arithmetic holds.
            if let Some(&back) = s.admissions.back() {
                target = target.max(back);
            }
            s.admissions.push_back(target);
            target
        };

        if target > now {
            tracing::debug!(wait_ms = (target - now).as_millis() as u64, "rate limit wait");
            let reservation = Reservation {
                limiter: self,
                at: target,
                armed: true,
            };
            tokio::time::sleep_until(target).await;
            reservation.disarm();
        }
        Ok(())
    }

    /// Snapshot of the current budget.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn state(&self) -> QuotaState {
        let now = Instant::now();
        let s = self.state.lock().expect("mutex poisoned");
        let in_window = s
            .admissions
            .iter()
            .filter(|&&t| now.duration_since(t) < self.cfg.window)
            .count() as u64;
        let limit = u64::from(self.cfg.max_calls);
        let reset_in = s
            .admissions
            .front()
            .map_or(Duration::ZERO, |&front| {
                (front + self.cfg.window).saturating_duration_since(now)
            });
        QuotaState {
            limit,
            remaining: limit.saturating_sub(in_window),
            reset_in,
            daily_remaining: self
                .cfg
                .daily_cap
                .map(|cap| u64::from(cap.saturating_sub(s.day_used))),
        }
    }

    fn release(&self, at: Instant) {
        let mut s = self.state.lock().expect("mutex poisoned");
        if let Some(pos) = s.admissions.iter().rposition(|&t| t == at) {
            s.admissions.remove(pos);
        }
        if self.cfg.daily_cap.is_some() {
            s.day_used = s.day_used.saturating_sub(1);
        }
    }
}

/// Releases a promised admission if the waiter is dropped before it arrives.
struct Reservation<'a> {
    limiter: &'a RateLimiter,
    at: Instant,
    armed: bool,
}

impl Reservation<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.limiter.release(self.at);
        }
    }
}

/// Wrapper that gates every quota-consuming call through a [`RateLimiter`].
pub struct RateLimitedConnector {
    inner: Arc<dyn SourceConnector>,
    limiter: RateLimiter,
}

impl RateLimitedConnector {
    /// Wrap `inner` with a fresh limiter for `cfg`.
    #[must_use]
    pub fn new(inner: Arc<dyn SourceConnector>, cfg: RateLimitConfig) -> Self {
        Self {
            inner,
            limiter: RateLimiter::new(cfg),
        }
    }

    /// Snapshot of the wrapped budget.
    #[must_use]
    pub fn quota_state(&self) -> QuotaState {
        self.limiter.state()
    }
}

#[async_trait]
impl SourceConnector for RateLimitedConnector {
    fn name(&self) -> &'static str {
        self.inner.name()
    }
    fn vendor(&self) -> &'static str {
        self.inner.vendor()
    }
    fn supports(&self, category: DataCategory) -> bool {
        self.inner.supports(category)
    }
    // The probe stays quota-free by contract.
    async fn is_available(&self) -> bool {
        self.inner.is_available().await
    }
    rotunda_connector_accessors!(inner);
}

#[async_trait]
impl TradeFeedProvider for RateLimitedConnector {
    async fn trades_page(
        &self,
        query: &TradeQuery,
        page: PageRequest,
    ) -> Result<TradePage, RotundaError> {
        self.limiter.acquire().await?;
        let inner = self
            .inner
            .as_trade_feed_provider()
            .ok_or_else(|| RotundaError::unsupported("trades"))?;
        inner.trades_page(query, page).await
    }

    fn max_page_size(&self) -> usize {
        self.inner
            .as_trade_feed_provider()
            .map_or(100, TradeFeedProvider::max_page_size)
    }
}

#[async_trait]
impl OptionChainProvider for RateLimitedConnector {
    async fn chain_page(
        &self,
        query: &ChainQuery,
        page: PageRequest,
    ) -> Result<ChainPage, RotundaError> {
        self.limiter.acquire().await?;
        let inner = self
            .inner
            .as_option_chain_provider()
            .ok_or_else(|| RotundaError::unsupported("option-chain"))?;
        inner.chain_page(query, page).await
    }

    fn max_page_size(&self) -> usize {
        self.inner
            .as_option_chain_provider()
            .map_or(100, OptionChainProvider::max_page_size)
    }
}

#[async_trait]
impl CompanyNameProvider for RateLimitedConnector {
    async fn company_name(&self, ticker: &str) -> Result<Option<String>, RotundaError> {
        self.limiter.acquire().await?;
        let inner = self
            .inner
            .as_company_name_provider()
            .ok_or_else(|| RotundaError::unsupported("company-name"))?;
        inner.company_name(ticker).await
    }
}

/// Declarative layer for constructing a [`RateLimitedConnector`] through the
/// builder.
pub struct RateLimitMiddleware {
    config: RateLimitConfig,
}

impl RateLimitMiddleware {
    /// Capture the limiter configuration.
    #[must_use]
    pub const fn new(config: RateLimitConfig) -> Self {
        Self { config }
    }
}

impl Middleware for RateLimitMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn SourceConnector>) -> Arc<dyn SourceConnector> {
        Arc::new(RateLimitedConnector::new(inner, self.config))
    }

    fn name(&self) -> &'static str {
        "RateLimitedConnector"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "max_calls": self.config.max_calls,
            "window_ms": self.config.window.as_millis(),
            "daily_cap": self.config.daily_cap,
        })
    }
}
