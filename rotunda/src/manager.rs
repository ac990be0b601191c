//! The cache-fronted request path: fingerprinting, singleflight, bounded
//! workers, pagination, enrichment, and the stale-fallback policy.

use std::collections::HashMap;
use std::sync::Arc;

use futures::TryFutureExt;
use rotunda_core::{Fingerprint, Paginator, RotundaError};
use rotunda_middleware::CacheLookup;
use rotunda_types::{
    CacheStatus, ChainQuery, ContractSnapshot, DataCategory, EntryStatus, FetchResult, ServedFrom,
    TradeQuery, TradeRecord,
};
use tokio::sync::Mutex;

use crate::core::Rotunda;

/// Per-request options on the query interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Skip the cache read; a success still writes through, and a failure
    /// never evicts the previous good entry.
    pub force_refresh: bool,
}

impl FetchOptions {
    /// Options requesting a forced refresh.
    #[must_use]
    pub const fn refresh() -> Self {
        Self {
            force_refresh: true,
        }
    }
}

/// A category-tagged query, for callers that route generically.
#[derive(Debug, Clone)]
pub enum DataRequest {
    /// Trade-disclosure query.
    Trades(TradeQuery),
    /// Options-chain query.
    OptionChain(ChainQuery),
}

/// The payload matching a [`DataRequest`].
#[derive(Debug, Clone)]
pub enum DataResponse {
    /// Trade disclosures.
    Trades(FetchResult<TradeRecord>),
    /// Options-chain snapshots.
    OptionChain(FetchResult<ContractSnapshot>),
}

impl Rotunda {
    /// Fetch trade disclosures matching `query`.
    ///
    /// Path: fingerprint → cache (unless forced) → singleflight with other
    /// identical in-flight requests → worker permit → priority fallback with
    /// pagination → de-duplication and enrichment → write-through. After a
    /// total upstream failure a retained stale entry is served, tagged
    /// [`ServedFrom::StaleCache`]; this façade is the only layer allowed to
    /// degrade that way.
    ///
    /// # Errors
    /// [`RotundaError::AllSourcesFailed`] when every source failed and no
    /// stale entry exists (or stale service is disabled);
    /// [`RotundaError::Unsupported`] when no registered source serves trades.
    pub async fn trades(
        &self,
        query: &TradeQuery,
        opts: FetchOptions,
    ) -> Result<FetchResult<TradeRecord>, RotundaError> {
        let fingerprint = Fingerprint::trades(query);
        if !opts.force_refresh
            && let CacheLookup::Fresh(hit) = self.cache.get_trades(&fingerprint)
        {
            tracing::debug!("trades served from cache");
            return Ok(hit.served(ServedFrom::Cache));
        }

        let flight = self.flight_for(&fingerprint);
        let _leader = flight.lock().await;
        // A previous flight may have filled the cache while we waited.
        if !opts.force_refresh
            && let CacheLookup::Fresh(hit) = self.cache.get_trades(&fingerprint)
        {
            return Ok(hit.served(ServedFrom::Cache));
        }

        let outcome = {
            let _permit = self
                .workers
                .acquire()
                .await
                .expect("worker semaphore is never closed");
            self.fetch_trades_upstream(query).await
        };

        let result = match outcome {
            Ok(mut result) => {
                self.enrich_companies(&mut result.records).await;
                self.cache.put_trades(fingerprint.clone(), result.clone());
                Ok(result)
            }
            Err(err) => self.serve_stale_trades(&fingerprint, err),
        };
        self.finish_flight(&fingerprint);
        result
    }

    /// Fetch an options chain matching `query`. Same path as [`Self::trades`]
    /// minus enrichment.
    ///
    /// # Errors
    /// See [`Self::trades`].
    pub async fn option_chain(
        &self,
        query: &ChainQuery,
        opts: FetchOptions,
    ) -> Result<FetchResult<ContractSnapshot>, RotundaError> {
        let fingerprint = Fingerprint::chain(query);
        if !opts.force_refresh
            && let CacheLookup::Fresh(hit) = self.cache.get_chain(&fingerprint)
        {
            tracing::debug!("chain served from cache");
            return Ok(hit.served(ServedFrom::Cache));
        }

        let flight = self.flight_for(&fingerprint);
        let _leader = flight.lock().await;
        if !opts.force_refresh
            && let CacheLookup::Fresh(hit) = self.cache.get_chain(&fingerprint)
        {
            return Ok(hit.served(ServedFrom::Cache));
        }

        let outcome = {
            let _permit = self
                .workers
                .acquire()
                .await
                .expect("worker semaphore is never closed");
            self.fetch_chain_upstream(query).await
        };

        let result = match outcome {
            Ok(result) => {
                self.cache.put_chain(fingerprint.clone(), result.clone());
                Ok(result)
            }
            Err(err) => self.serve_stale_chain(&fingerprint, err),
        };
        self.finish_flight(&fingerprint);
        result
    }

    /// Route a category-tagged request.
    ///
    /// # Errors
    /// See [`Self::trades`].
    pub async fn get_data(
        &self,
        request: &DataRequest,
        opts: FetchOptions,
    ) -> Result<DataResponse, RotundaError> {
        match request {
            DataRequest::Trades(query) => {
                self.trades(query, opts).await.map(DataResponse::Trades)
            }
            DataRequest::OptionChain(query) => self
                .option_chain(query, opts)
                .await
                .map(DataResponse::OptionChain),
        }
    }

    /// Aggregate cache health.
    #[must_use]
    pub fn cache_status(&self) -> CacheStatus {
        self.cache.status()
    }

    /// Status of the cache entry for one trade query, if present.
    #[must_use]
    pub fn trades_entry_status(&self, query: &TradeQuery) -> Option<EntryStatus> {
        self.cache.entry_status(&Fingerprint::trades(query))
    }

    /// Status of the cache entry for one chain query, if present.
    #[must_use]
    pub fn chain_entry_status(&self, query: &ChainQuery) -> Option<EntryStatus> {
        self.cache.entry_status(&Fingerprint::chain(query))
    }

    /// Drop the cached entry for one trade query.
    pub fn invalidate_trades(&self, query: &TradeQuery) {
        self.cache.invalidate(&Fingerprint::trades(query));
    }

    /// Drop the cached entry for one chain query.
    pub fn invalidate_chain(&self, query: &ChainQuery) {
        self.cache.invalidate(&Fingerprint::chain(query));
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    async fn fetch_trades_upstream(
        &self,
        query: &TradeQuery,
    ) -> Result<FetchResult<TradeRecord>, RotundaError> {
        let paginator = Paginator::new(self.cfg.paging);
        let (parts, source) = self
            .fetch_with_fallback(DataCategory::Trades, "trades", |connector| {
                connector.as_trade_feed_provider()?;
                let query = query.clone();
                Some(async move {
                    let provider = connector
                        .as_trade_feed_provider()
                        .ok_or_else(|| RotundaError::unsupported("trades"))?;
                    paginator
                        .drain(|page| {
                            provider
                                .trades_page(&query, page)
                                .map_ok(|p| (p.records, p.next))
                        })
                        .await
                })
            })
            .await?;
        let (records, partial) = parts;
        Ok(FetchResult::new(rotunda_core::dedupe_trades(records), source).partial(partial))
    }

    async fn fetch_chain_upstream(
        &self,
        query: &ChainQuery,
    ) -> Result<FetchResult<ContractSnapshot>, RotundaError> {
        let paginator = Paginator::new(self.cfg.paging);
        let (parts, source) = self
            .fetch_with_fallback(DataCategory::OptionChain, "option-chain", |connector| {
                connector.as_option_chain_provider()?;
                let query = query.clone();
                Some(async move {
                    let provider = connector
                        .as_option_chain_provider()
                        .ok_or_else(|| RotundaError::unsupported("option-chain"))?;
                    paginator
                        .drain(|page| {
                            provider
                                .chain_page(&query, page)
                                .map_ok(|p| (p.records, p.next))
                        })
                        .await
                })
            })
            .await?;
        let (records, partial) = parts;
        Ok(FetchResult::new(rotunda_core::dedupe_contracts(records), source).partial(partial))
    }

    fn serve_stale_trades(
        &self,
        fingerprint: &Fingerprint,
        err: RotundaError,
    ) -> Result<FetchResult<TradeRecord>, RotundaError> {
        if self.cfg.serve_stale_on_failure {
            match self.cache.get_trades(fingerprint) {
                CacheLookup::Fresh(hit) | CacheLookup::Stale(hit) => {
                    tracing::warn!(error = %err, "every source failed, serving stale trades");
                    return Ok(hit.served(ServedFrom::StaleCache));
                }
                CacheLookup::Miss => {}
            }
        }
        Err(err)
    }

    fn serve_stale_chain(
        &self,
        fingerprint: &Fingerprint,
        err: RotundaError,
    ) -> Result<FetchResult<ContractSnapshot>, RotundaError> {
        if self.cfg.serve_stale_on_failure {
            match self.cache.get_chain(fingerprint) {
                CacheLookup::Fresh(hit) | CacheLookup::Stale(hit) => {
                    tracing::warn!(error = %err, "every source failed, serving stale chain");
                    return Ok(hit.served(ServedFrom::StaleCache));
                }
                CacheLookup::Miss => {}
            }
        }
        Err(err)
    }

    /// Opportunistically fill missing company names through the directory,
    /// one lookup per distinct ticker. Lookup failures and unknowns never
    /// fail the surrounding fetch.
    async fn enrich_companies(&self, records: &mut [TradeRecord]) {
        let Some(directory) = &self.directory else {
            return;
        };
        let mut names: HashMap<String, Option<String>> = HashMap::new();
        for record in records.iter() {
            if record.company.is_none() {
                names.entry(record.ticker.clone()).or_default();
            }
        }
        for (ticker, slot) in &mut names {
            match directory.company_name(ticker).await {
                Ok(found) => *slot = found,
                Err(err) => {
                    tracing::debug!(ticker = %ticker, error = %err, "name lookup failed");
                }
            }
        }
        for record in records.iter_mut() {
            if record.company.is_none()
                && let Some(Some(name)) = names.get(&record.ticker)
            {
                record.company = Some(name.clone());
            }
        }
    }

    fn flight_for(&self, fingerprint: &Fingerprint) -> Arc<Mutex<()>> {
        let mut flights = self.flights.lock().expect("mutex poisoned");
        flights
            .entry(fingerprint.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn finish_flight(&self, fingerprint: &Fingerprint) {
        let mut flights = self.flights.lock().expect("mutex poisoned");
        flights.remove(fingerprint);
    }
}
