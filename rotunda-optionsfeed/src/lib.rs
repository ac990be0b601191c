#![doc = include_str!("../README.md")]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use rotunda_core::RotundaError;
use rotunda_core::connector::{OptionChainProvider, SourceConnector};
use rotunda_middleware::ConnectorBuilder;
use rotunda_types::{
    ChainPage, ChainQuery, CooldownConfig, DataCategory, PageRequest, PageToken, RateLimitConfig,
    RetryConfig,
};

mod model;

use model::ChainEnvelope;

const DEFAULT_BASE_URL: &str = "https://api.optionsfeed.io";
/// Documented free-tier budget.
const CALLS_PER_MINUTE: u32 = 5;
const CALLS_PER_DAY: u32 = 250;

/// How the API key rides along on each request.
#[derive(Debug, Clone)]
pub enum ApiAuth {
    /// `apiKey=<key>` query parameter.
    QueryKey(String),
    /// `Authorization: Bearer <key>` header.
    Bearer(String),
}

/// REST connector for OptionsFeed chain snapshots. Cursor-token pagination,
/// per-underlying queries, key-authenticated.
pub struct OptionsFeedConnector {
    http: reqwest::Client,
    base_url: Url,
    auth: ApiAuth,
}

impl OptionsFeedConnector {
    /// Returns an unconfigured builder around a query-key-authenticated
    /// connector.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> ConnectorBuilder {
        ConnectorBuilder::new(Arc::new(Self::new_raw(ApiAuth::QueryKey(api_key.into()))))
    }

    /// Returns a builder with the free-tier quota (5/min, 250/day), default
    /// retries, and a five-minute cooldown already applied.
    #[must_use]
    pub fn rate_limited(api_key: impl Into<String>) -> ConnectorBuilder {
        ConnectorBuilder::new(Arc::new(Self::new_raw(ApiAuth::QueryKey(api_key.into()))))
            .with_rate_limit(&RateLimitConfig {
                max_calls: CALLS_PER_MINUTE,
                window: Duration::from_secs(60),
                daily_cap: Some(CALLS_PER_DAY),
            })
            .with_retry(RetryConfig::default())
            .with_cooldown(CooldownConfig::default())
    }

    /// Expert-only: construct an unwrapped connector for manual composition.
    #[must_use]
    pub fn new_raw(auth: ApiAuth) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, auth).expect("default base URL is valid")
    }

    /// Point the connector at a different host (tests, mirrors).
    ///
    /// # Errors
    /// Returns `InvalidArg` when `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str, auth: ApiAuth) -> Result<Self, RotundaError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RotundaError::invalid_arg(format!("bad base url {base_url:?}: {e}")))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("rotunda/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client construction only fails on TLS backend misconfiguration");
        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    fn chain_url(&self, query: &ChainQuery, cursor: Option<&str>, limit: usize) -> Result<Url, RotundaError> {
        let underlying = query.underlying.to_ascii_uppercase();
        if underlying.is_empty() {
            return Err(RotundaError::invalid_arg("empty underlying symbol"));
        }
        let mut url = self
            .base_url
            .join(&format!("v1/chains/{underlying}"))
            .map_err(|e| RotundaError::invalid_arg(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &limit.to_string());
            if let Some(expiry) = query.expiry {
                pairs.append_pair("expiry", &expiry.format("%Y-%m-%d").to_string());
            }
            if let Some(side) = query.contract_type {
                pairs.append_pair("type", side.as_str());
            }
            if let Some(cursor) = cursor {
                pairs.append_pair("cursor", cursor);
            }
            if let ApiAuth::QueryKey(key) = &self.auth {
                pairs.append_pair("apiKey", key);
            }
        }
        Ok(url)
    }

    fn request(&self, url: Url) -> reqwest::RequestBuilder {
        let req = self.http.get(url);
        match &self.auth {
            ApiAuth::Bearer(key) => req.bearer_auth(key),
            ApiAuth::QueryKey(_) => req,
        }
    }
}

#[async_trait]
impl SourceConnector for OptionsFeedConnector {
    fn name(&self) -> &'static str {
        "optionsfeed"
    }
    fn vendor(&self) -> &'static str {
        "OptionsFeed"
    }
    fn supports(&self, category: DataCategory) -> bool {
        matches!(category, DataCategory::OptionChain)
    }

    // The status endpoint is unmetered, so the probe spends no quota.
    async fn is_available(&self) -> bool {
        let Ok(url) = self.base_url.join("v1/status") else {
            return false;
        };
        match self.request(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::warn!(error = %err, "optionsfeed unreachable");
                false
            }
        }
    }

    fn as_option_chain_provider(&self) -> Option<&dyn OptionChainProvider> {
        Some(self as &dyn OptionChainProvider)
    }
}

#[async_trait]
impl OptionChainProvider for OptionsFeedConnector {
    async fn chain_page(
        &self,
        query: &ChainQuery,
        page: PageRequest,
    ) -> Result<ChainPage, RotundaError> {
        let cursor = match &page.token {
            None => None,
            Some(PageToken::Cursor(c)) => Some(c.as_str()),
            Some(PageToken::Offset(_)) => {
                return Err(RotundaError::invalid_arg(
                    "optionsfeed paginates by cursor, not page number",
                ));
            }
        };
        let limit = page.limit.min(self.max_page_size());
        let url = self.chain_url(query, cursor, limit)?;
        tracing::debug!(underlying = %query.underlying, "fetching chain page");

        let response = self
            .request(url)
            .send()
            .await
            .map_err(|e| RotundaError::transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(RotundaError::from_status(status.as_u16(), retry_after));
        }
        let body = response
            .text()
            .await
            .map_err(|e| RotundaError::transport(e.to_string()))?;
        let envelope: ChainEnvelope =
            serde_json::from_str(&body).map_err(|e| RotundaError::parse(e.to_string()))?;

        let records = envelope
            .results
            .into_iter()
            .map(model::RawContract::normalize)
            .collect::<Result<Vec<_>, _>>()?;
        let next = envelope
            .next_cursor
            .filter(|c| !c.is_empty())
            .map(PageToken::Cursor);
        Ok(ChainPage { records, next })
    }

    fn max_page_size(&self) -> usize {
        250
    }
}
