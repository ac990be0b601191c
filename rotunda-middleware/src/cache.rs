//! Fingerprint-keyed freshness cache.
//!
//! Lifetimes are resolved at write time from the category policy table
//! crossed with the trading-session calendar; expired entries are retained
//! (until LRU capacity evicts them) so the façade can serve a stale payload
//! as a degraded response when every upstream fails.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::Utc;
use lru::LruCache;
use rotunda_core::{Fingerprint, TradingCalendar};
use rotunda_types::{
    CacheConfig, CacheStatus, ContractSnapshot, EntryStatus, FetchResult, TradeRecord,
};

/// Outcome of a cache read.
#[derive(Debug)]
pub enum CacheLookup<V> {
    /// Entry present and within its lifetime.
    Fresh(V),
    /// Entry present but expired; usable only as a degraded response.
    Stale(V),
    /// No entry.
    Miss,
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

struct TtlStore<V> {
    inner: Mutex<LruCache<Fingerprint, Entry<V>>>,
}

impl<V: Clone> TtlStore<V> {
    fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).expect("nonzero capacity");
        Self {
            inner: Mutex::new(LruCache::new(cap)),
        }
    }

    fn get(&self, key: &Fingerprint) -> CacheLookup<V> {
        let mut guard = self.inner.lock().expect("mutex poisoned");
        match guard.get(key) {
            Some(entry) if Instant::now() <= entry.expires_at => {
                CacheLookup::Fresh(entry.value.clone())
            }
            Some(entry) => CacheLookup::Stale(entry.value.clone()),
            None => CacheLookup::Miss,
        }
    }

    fn put(&self, key: Fingerprint, value: V, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        let mut guard = self.inner.lock().expect("mutex poisoned");
        guard.put(key, entry);
    }

    fn remove(&self, key: &Fingerprint) {
        let mut guard = self.inner.lock().expect("mutex poisoned");
        guard.pop(key);
    }

    fn clear(&self) {
        let mut guard = self.inner.lock().expect("mutex poisoned");
        guard.clear();
    }

    fn counts(&self) -> (usize, usize) {
        let now = Instant::now();
        let guard = self.inner.lock().expect("mutex poisoned");
        let fresh = guard.iter().filter(|(_, e)| now <= e.expires_at).count();
        (guard.len(), fresh)
    }

    fn status_with<F>(&self, key: &Fingerprint, describe: F) -> Option<EntryStatus>
    where
        F: FnOnce(&V) -> EntryStatus,
    {
        let mut guard = self.inner.lock().expect("mutex poisoned");
        guard.get(key).map(|entry| {
            let mut status = describe(&entry.value);
            status.expires_in = entry
                .expires_at
                .checked_duration_since(Instant::now());
            status
        })
    }
}

/// Freshness-aware response cache shared by the façade.
///
/// Entries are replaced wholesale on `put`; readers never observe a
/// half-written payload.
pub struct ResponseCache {
    cfg: CacheConfig,
    calendar: TradingCalendar,
    trades: TtlStore<FetchResult<TradeRecord>>,
    chains: TtlStore<FetchResult<ContractSnapshot>>,
}

impl ResponseCache {
    /// Build a cache with the given policy table and session calendar.
    #[must_use]
    pub fn new(cfg: CacheConfig, calendar: TradingCalendar) -> Self {
        let capacity = cfg.max_entries;
        Self {
            cfg,
            calendar,
            trades: TtlStore::new(capacity),
            chains: TtlStore::new(capacity),
        }
    }

    fn ttl_for(&self, fingerprint: &Fingerprint) -> Duration {
        let now = Utc::now();
        self.cfg.ttl_for(
            fingerprint.category(),
            self.calendar.is_open_at(now),
            fingerprint.is_historical(now.date_naive()),
        )
    }

    /// Look up a cached trade result.
    #[must_use]
    pub fn get_trades(&self, fingerprint: &Fingerprint) -> CacheLookup<FetchResult<TradeRecord>> {
        self.trades.get(fingerprint)
    }

    /// Cache a trade result; the lifetime is resolved now, at write time.
    pub fn put_trades(&self, fingerprint: Fingerprint, result: FetchResult<TradeRecord>) {
        let ttl = self.ttl_for(&fingerprint);
        self.trades.put(fingerprint, result, ttl);
    }

    /// Look up a cached chain result.
    #[must_use]
    pub fn get_chain(&self, fingerprint: &Fingerprint) -> CacheLookup<FetchResult<ContractSnapshot>> {
        self.chains.get(fingerprint)
    }

    /// Cache a chain result.
    pub fn put_chain(&self, fingerprint: Fingerprint, result: FetchResult<ContractSnapshot>) {
        let ttl = self.ttl_for(&fingerprint);
        self.chains.put(fingerprint, result, ttl);
    }

    /// Drop one entry.
    pub fn invalidate(&self, fingerprint: &Fingerprint) {
        self.trades.remove(fingerprint);
        self.chains.remove(fingerprint);
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        self.trades.clear();
        self.chains.clear();
    }

    /// Aggregate cache health.
    #[must_use]
    pub fn status(&self) -> CacheStatus {
        let (t_total, t_fresh) = self.trades.counts();
        let (c_total, c_fresh) = self.chains.counts();
        let entries = t_total + c_total;
        let fresh = t_fresh + c_fresh;
        CacheStatus {
            entries,
            fresh,
            stale: entries - fresh,
        }
    }

    /// Status of one entry, if present.
    #[must_use]
    pub fn entry_status(&self, fingerprint: &Fingerprint) -> Option<EntryStatus> {
        let describe_trades = |r: &FetchResult<TradeRecord>| EntryStatus {
            source: r.source,
            fetched_at: r.fetched_at,
            expires_in: None,
            records: r.len(),
        };
        let describe_chain = |r: &FetchResult<ContractSnapshot>| EntryStatus {
            source: r.source,
            fetched_at: r.fetched_at,
            expires_in: None,
            records: r.len(),
        };
        self.trades
            .status_with(fingerprint, describe_trades)
            .or_else(|| self.chains.status_with(fingerprint, describe_chain))
    }
}
