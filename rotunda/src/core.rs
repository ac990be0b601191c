use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rotunda_core::connector::{CompanyNameProvider, SourceConnector};
use rotunda_core::{Fingerprint, RotundaError, TradingCalendar};
use rotunda_middleware::ResponseCache;
use rotunda_types::{
    CacheConfig, DataCategory, PagingConfig, RotundaConfig, SourceKey,
};
use tokio::sync::{Mutex, Semaphore};

/// Orchestrator and public façade: routes requests across registered sources,
/// guards them behind the freshness cache, and bounds concurrent upstream
/// work.
pub struct Rotunda {
    pub(crate) connectors: Vec<Arc<dyn SourceConnector>>,
    pub(crate) cfg: RotundaConfig,
    pub(crate) cache: ResponseCache,
    pub(crate) workers: Semaphore,
    pub(crate) flights: std::sync::Mutex<HashMap<Fingerprint, Arc<Mutex<()>>>>,
    pub(crate) directory: Option<Arc<dyn CompanyNameProvider>>,
}

/// Builder for constructing a [`Rotunda`] engine.
pub struct RotundaBuilder {
    connectors: Vec<Arc<dyn SourceConnector>>,
    cfg: RotundaConfig,
    calendar: TradingCalendar,
    directory: Option<Arc<dyn CompanyNameProvider>>,
}

impl Default for RotundaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RotundaBuilder {
    /// Create a builder with standard configuration and no sources.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            cfg: RotundaConfig::standard(),
            calendar: TradingCalendar::nyse(),
            directory: None,
        }
    }

    /// Register a source. Registration order is the fallback order unless a
    /// per-category preference overrides it.
    #[must_use]
    pub fn with_connector(mut self, connector: Arc<dyn SourceConnector>) -> Self {
        self.connectors.push(connector);
        self
    }

    /// Set preferred sources for one category, most preferred first.
    ///
    /// Listed sources come first; capable sources left unlisted keep their
    /// registration order after them. Keys that match no registered source are
    /// dropped at build time.
    #[must_use]
    pub fn prefer_for_category(
        mut self,
        category: DataCategory,
        connectors_desc: &[Arc<dyn SourceConnector>],
    ) -> Self {
        let keys: Vec<SourceKey> = connectors_desc.iter().map(|c| c.key()).collect();
        self.cfg.category_priority.insert(category, keys);
        self
    }

    /// Attach the company-name enrichment collaborator.
    #[must_use]
    pub fn with_name_lookup(mut self, directory: Arc<dyn CompanyNameProvider>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Set the per-source attempt timeout.
    #[must_use]
    pub const fn source_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.cfg.source_timeout = timeout;
        self
    }

    /// Bound the number of concurrently executing upstream fetches.
    #[must_use]
    pub const fn max_concurrent_fetches(mut self, workers: usize) -> Self {
        self.cfg.max_concurrent_fetches = workers;
        self
    }

    /// Replace the cache freshness policy.
    #[must_use]
    pub fn cache_config(mut self, cache: CacheConfig) -> Self {
        self.cfg.cache = cache;
        self
    }

    /// Replace the trading calendar behind freshness decisions.
    #[must_use]
    pub fn calendar(mut self, calendar: TradingCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Replace the pagination bounds.
    #[must_use]
    pub const fn paging(mut self, paging: PagingConfig) -> Self {
        self.cfg.paging = paging;
        self
    }

    /// Control whether an expired cache entry is served after a total fetch
    /// failure.
    #[must_use]
    pub const fn serve_stale_on_failure(mut self, yes: bool) -> Self {
        self.cfg.serve_stale_on_failure = yes;
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no sources have been registered.
    pub fn build(mut self) -> Result<Rotunda, RotundaError> {
        if self.connectors.is_empty() {
            return Err(RotundaError::invalid_arg(
                "no sources registered; add at least one via with_connector(...)",
            ));
        }

        // Drop unknown priority keys and de-duplicate, keeping first mention.
        let known: HashSet<&'static str> = self.connectors.iter().map(|c| c.name()).collect();
        for keys in self.cfg.category_priority.values_mut() {
            let mut seen: HashSet<&'static str> = HashSet::new();
            keys.retain(|k| known.contains(k.as_str()) && seen.insert(k.as_str()));
        }

        let workers = self.cfg.max_concurrent_fetches.max(1);
        Ok(Rotunda {
            cache: ResponseCache::new(self.cfg.cache.clone(), self.calendar),
            workers: Semaphore::new(workers),
            flights: std::sync::Mutex::new(HashMap::new()),
            directory: self.directory,
            connectors: self.connectors,
            cfg: self.cfg,
        })
    }
}

impl Rotunda {
    /// Start building a new engine.
    #[must_use]
    pub fn builder() -> RotundaBuilder {
        RotundaBuilder::new()
    }

    /// Sources in attempt order for `category`.
    pub(crate) fn ordered(&self, category: DataCategory) -> Vec<Arc<dyn SourceConnector>> {
        let mut out: Vec<(usize, Arc<dyn SourceConnector>)> =
            self.connectors.iter().cloned().enumerate().collect();
        if let Some(pref) = self.cfg.category_priority.get(&category) {
            let pos: HashMap<&str, usize> = pref
                .iter()
                .enumerate()
                .map(|(i, k)| (k.as_str(), i))
                .collect();
            out.sort_by_key(|(orig_i, c)| {
                (pos.get(c.name()).copied().unwrap_or(usize::MAX), *orig_i)
            });
        }
        out.into_iter().map(|(_, c)| c).collect()
    }

    /// Wrap a source future with the per-source timeout.
    pub(crate) async fn call_with_timeout<T, Fut>(
        source: SourceKey,
        capability: &'static str,
        timeout: std::time::Duration,
        fut: Fut,
    ) -> Result<T, RotundaError>
    where
        Fut: Future<Output = Result<T, RotundaError>>,
    {
        (tokio::time::timeout(timeout, fut).await).unwrap_or_else(|_| {
            Err(RotundaError::SourceTimeout { source, capability })
        })
    }

    /// Try each capable source strictly in priority order and return the first
    /// success with the serving source's key.
    ///
    /// Per attempt the availability probe runs first; an unavailable source is
    /// skipped with a recorded reason rather than spending its timeout. On the
    /// first success the remaining sources are never touched. When everything
    /// fails the aggregate carries one tagged reason per attempted source.
    pub(crate) async fn fetch_with_fallback<T, F, Fut>(
        &self,
        category: DataCategory,
        capability: &'static str,
        call: F,
    ) -> Result<(T, SourceKey), RotundaError>
    where
        T: Send,
        F: Fn(Arc<dyn SourceConnector>) -> Option<Fut> + Send,
        Fut: Future<Output = Result<T, RotundaError>> + Send,
    {
        let mut attempted_any = false;
        let mut errors: Vec<RotundaError> = Vec::new();

        for connector in self.ordered(category) {
            if !connector.supports(category) {
                continue;
            }
            let Some(fut) = call(connector.clone()) else {
                continue;
            };
            attempted_any = true;

            if !connector.is_available().await {
                tracing::warn!(source = connector.name(), "source unavailable, skipping");
                errors.push(RotundaError::tagged(
                    connector.key(),
                    RotundaError::Unavailable,
                ));
                continue;
            }

            tracing::debug!(source = connector.name(), capability, "trying source");
            match Self::call_with_timeout(
                connector.key(),
                capability,
                self.cfg.source_timeout,
                fut,
            )
            .await
            {
                Ok(value) => {
                    tracing::info!(source = connector.name(), capability, "source served request");
                    return Ok((value, connector.key()));
                }
                Err(err) => {
                    tracing::warn!(
                        source = connector.name(),
                        capability,
                        error = %err,
                        "source failed, falling back"
                    );
                    errors.push(RotundaError::tagged(connector.key(), err));
                }
            }
        }

        if !attempted_any {
            return Err(RotundaError::unsupported(capability));
        }
        Err(RotundaError::AllSourcesFailed(errors))
    }
}
