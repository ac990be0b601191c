//! Configuration types shared across the orchestrator, middleware, and
//! connectors.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::query::DataCategory;
use crate::source::SourceKey;

/// Call budget for one upstream, enforced by that connector's rate limiter.
///
/// The window budget is a sliding window: admission waits for the next free
/// slot. The daily cap fails fast instead, since waiting inside a request
/// cannot help until rollover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum admitted calls per window.
    pub max_calls: u32,
    /// Sliding window duration.
    pub window: Duration,
    /// Optional hard cap on admitted calls per rolling day.
    pub daily_cap: Option<u32>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_calls: 60,
            window: Duration::from_secs(60),
            daily_cap: None,
        }
    }
}

/// Snapshot of a rate limiter's budget at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    /// Configured maximum admissions per window.
    pub limit: u64,
    /// Admissions still available in the current window.
    pub remaining: u64,
    /// Time until the oldest in-window admission expires.
    pub reset_in: Duration,
    /// Admissions still available under the daily cap, when one is set.
    pub daily_remaining: Option<u64>,
}

/// Exponential backoff-with-jitter policy for retrying one upstream call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Base delay; attempt `n` backs off `base * 2^n` plus jitter in
    /// `[0, base)`.
    pub backoff_base: Duration,
    /// Ceiling applied to the computed delay before jitter.
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// How long a source sits out after exhausting its quota.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CooldownConfig {
    /// Fallback duration when the triggering error carries no reset hint.
    pub default_duration: Duration,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            default_duration: Duration::from_secs(5 * 60),
        }
    }
}

/// Freshness lifetimes for one data category, split by trading session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TtlPolicy {
    /// Lifetime for entries written while the market session is open.
    pub market_open: Duration,
    /// Lifetime for entries written while the session is closed.
    pub market_closed: Duration,
}

/// Freshness policy table for the response cache.
///
/// Lifetimes are resolved at write time: session-dependent per category, with
/// a single long lifetime for queries whose date range is entirely historical
/// (that data no longer changes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum cached fingerprints before LRU eviction.
    pub max_entries: usize,
    /// Policy for trade disclosures.
    pub trades: TtlPolicy,
    /// Policy for options-chain snapshots.
    pub option_chain: TtlPolicy,
    /// Lifetime for fully historical queries.
    pub historical: Duration,
}

impl CacheConfig {
    /// Resolve the lifetime for an entry written now.
    #[must_use]
    pub const fn ttl_for(&self, category: DataCategory, session_open: bool, historical: bool) -> Duration {
        if historical {
            return self.historical;
        }
        let policy = match category {
            DataCategory::Trades => &self.trades,
            DataCategory::OptionChain => &self.option_chain,
        };
        if session_open {
            policy.market_open
        } else {
            policy.market_closed
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            trades: TtlPolicy {
                market_open: Duration::from_secs(30 * 60),
                market_closed: Duration::from_secs(2 * 60 * 60),
            },
            option_chain: TtlPolicy {
                market_open: Duration::from_secs(2 * 60),
                market_closed: Duration::from_secs(30 * 60),
            },
            historical: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Pagination bounds applied when draining a paged upstream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Records requested per page.
    pub page_size: usize,
    /// Safety cap on total records per fetch; hitting it marks the result
    /// partial instead of silently truncating.
    pub max_records: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_records: 5_000,
        }
    }
}

/// Global configuration for the `Rotunda` orchestrator.
#[derive(Debug, Clone, Default)]
pub struct RotundaConfig {
    /// Per-category source ordering; sources absent from a list keep their
    /// registration order after the listed ones. Unknown keys are dropped at
    /// build time.
    pub category_priority: HashMap<DataCategory, Vec<SourceKey>>,
    /// Per-source attempt timeout.
    pub source_timeout: Duration,
    /// Upper bound on concurrently executing upstream fetches.
    pub max_concurrent_fetches: usize,
    /// Freshness policy for the response cache.
    pub cache: CacheConfig,
    /// Pagination bounds.
    pub paging: PagingConfig,
    /// Serve an expired cache entry when every source fails.
    pub serve_stale_on_failure: bool,
}

impl RotundaConfig {
    /// Defaults: 30s per-source timeout, 8 concurrent fetches, stale fallback
    /// enabled.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            category_priority: HashMap::new(),
            source_timeout: Duration::from_secs(30),
            max_concurrent_fetches: 8,
            cache: CacheConfig::default(),
            paging: PagingConfig::default(),
            serve_stale_on_failure: true,
        }
    }
}

/// Aggregate health of the response cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    /// Total retained entries, fresh or stale.
    pub entries: usize,
    /// Entries still within their lifetime.
    pub fresh: usize,
    /// Expired entries retained for degraded service.
    pub stale: usize,
}

/// Status of a single cache entry.
#[derive(Debug, Clone, Serialize)]
pub struct EntryStatus {
    /// Source that produced the cached payload.
    pub source: SourceKey,
    /// When the payload was fetched.
    pub fetched_at: DateTime<Utc>,
    /// Remaining lifetime; `None` once expired.
    pub expires_in: Option<Duration>,
    /// Number of cached records.
    pub records: usize,
}
