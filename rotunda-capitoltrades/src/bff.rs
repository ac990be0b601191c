//! Connector for the Capitol Trades BFF JSON endpoint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use rotunda_core::RotundaError;
use rotunda_core::connector::{SourceConnector, TradeFeedProvider};
use rotunda_middleware::ConnectorBuilder;
use rotunda_types::{
    CooldownConfig, DataCategory, PageRequest, PageToken, RateLimitConfig, RetryConfig, TradePage,
    TradeQuery,
};

use crate::client;
use crate::model::TradesEnvelope;

const DEFAULT_BASE_URL: &str = "https://bff.capitoltrades.com";
/// Undocumented but stable in practice; stay well under it.
const CALLS_PER_MINUTE: u32 = 30;

/// JSON API connector. Offset-style pagination (`page`/`pageSize` query
/// parameters), no authentication.
pub struct CapitolBffConnector {
    http: reqwest::Client,
    base_url: Url,
}

impl CapitolBffConnector {
    /// Returns an unconfigured builder around the default connector.
    ///
    /// Customize with builder methods before calling `.build()`.
    #[must_use]
    pub fn new() -> ConnectorBuilder {
        ConnectorBuilder::new(Arc::new(Self::new_raw()))
    }

    /// Returns a builder with the documented quota, default retries, and a
    /// five-minute cooldown already applied.
    #[must_use]
    pub fn rate_limited() -> ConnectorBuilder {
        ConnectorBuilder::new(Arc::new(Self::new_raw()))
            .with_rate_limit(&RateLimitConfig {
                max_calls: CALLS_PER_MINUTE,
                window: Duration::from_secs(60),
                daily_cap: None,
            })
            .with_retry(RetryConfig::default())
            .with_cooldown(CooldownConfig::default())
    }

    /// Expert-only: construct an unwrapped connector for manual composition.
    #[must_use]
    pub fn new_raw() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL).expect("default base URL is valid")
    }

    /// Point the connector at a different host (tests, mirrors).
    ///
    /// # Errors
    /// Returns `InvalidArg` when `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, RotundaError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RotundaError::invalid_arg(format!("bad base url {base_url:?}: {e}")))?;
        Ok(Self {
            http: client::build_client("application/json"),
            base_url,
        })
    }

    fn trades_url(&self, page: u32, page_size: usize) -> Result<Url, RotundaError> {
        let mut url = self
            .base_url
            .join("trades")
            .map_err(|e| RotundaError::invalid_arg(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("pageSize", &page_size.to_string());
        Ok(url)
    }
}

#[async_trait]
impl SourceConnector for CapitolBffConnector {
    fn name(&self) -> &'static str {
        "capitoltrades-bff"
    }
    fn vendor(&self) -> &'static str {
        "Capitol Trades"
    }
    fn supports(&self, category: DataCategory) -> bool {
        matches!(category, DataCategory::Trades)
    }

    async fn is_available(&self) -> bool {
        let Ok(url) = self.trades_url(1, 1) else {
            return false;
        };
        match self.http.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::warn!(error = %err, "capitol trades bff unreachable");
                false
            }
        }
    }

    fn as_trade_feed_provider(&self) -> Option<&dyn TradeFeedProvider> {
        Some(self as &dyn TradeFeedProvider)
    }
}

#[async_trait]
impl TradeFeedProvider for CapitolBffConnector {
    async fn trades_page(
        &self,
        query: &TradeQuery,
        page: PageRequest,
    ) -> Result<TradePage, RotundaError> {
        // The BFF counts pages from 1.
        let page_no = match page.token {
            None => 1,
            Some(PageToken::Offset(n)) => n,
            Some(PageToken::Cursor(_)) => {
                return Err(RotundaError::invalid_arg(
                    "capitol trades bff paginates by page number, not cursor",
                ));
            }
        };
        let limit = page.limit.min(self.max_page_size());
        let url = self.trades_url(page_no, limit)?;
        tracing::debug!(%url, "fetching trades page");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| client::transport(&e))?;
        let response = client::check_status(response)?;
        let body = response
            .text()
            .await
            .map_err(|e| client::transport(&e))?;
        let envelope: TradesEnvelope =
            serde_json::from_str(&body).map_err(|e| RotundaError::parse(e.to_string()))?;

        let exhausted = envelope
            .meta
            .as_ref()
            .and_then(|m| m.paging.as_ref())
            .is_some_and(|p| p.total_pages.is_some_and(|total| p.page >= total));
        let upstream_count = envelope.data.len();
        // A short page from an envelope without paging metadata also means
        // end-of-data.
        let last_page = exhausted || upstream_count < limit || upstream_count == 0;

        let records =
            rotunda_core::apply_trade_query(crate::model::normalize_all(envelope.data)?, query);
        let next = (!last_page).then(|| PageToken::Offset(page_no + 1));
        Ok(TradePage { records, next })
    }

    fn max_page_size(&self) -> usize {
        100
    }
}
