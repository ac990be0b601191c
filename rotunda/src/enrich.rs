//! Ticker → company-name enrichment collaborator.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use rotunda_core::RotundaError;
use rotunda_core::connector::CompanyNameProvider;
use rotunda_middleware::RateLimiter;
use rotunda_types::RateLimitConfig;

const DEFAULT_BASE_URL: &str = "https://ticker-2e1ica8b9.now.sh";

#[derive(Debug, Deserialize)]
struct DirectoryResponse {
    #[serde(default)]
    results: Vec<DirectoryEntry>,
}

#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    name: Option<String>,
}

/// HTTP lookup client for the public ticker directory.
///
/// The directory is itself quota-limited, so lookups ride behind their own
/// [`RateLimiter`], and results (including "unknown") are memoized for the
/// process lifetime.
pub struct TickerDirectory {
    http: reqwest::Client,
    base_url: Url,
    limiter: RateLimiter,
    memo: tokio::sync::Mutex<HashMap<String, Option<String>>>,
}

impl TickerDirectory {
    /// Client against the public directory with a polite lookup cadence.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL).expect("default base URL is valid")
    }

    /// Point the client at a different host (tests, mirrors).
    ///
    /// # Errors
    /// Returns `InvalidArg` when `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, RotundaError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RotundaError::invalid_arg(format!("bad base url {base_url:?}: {e}")))?;
        let http = reqwest::Client::builder()
            .user_agent("Congressional-Trading-Dashboard/1.0")
            .timeout(Duration::from_secs(5))
            .build()
            .expect("reqwest client construction only fails on TLS backend misconfiguration");
        Ok(Self {
            http,
            base_url,
            limiter: RateLimiter::new(RateLimitConfig {
                max_calls: 60,
                window: Duration::from_secs(60),
                daily_cap: None,
            }),
            memo: tokio::sync::Mutex::new(HashMap::new()),
        })
    }

    async fn fetch_name(&self, ticker: &str) -> Result<Option<String>, RotundaError> {
        self.limiter.acquire().await?;
        let url = self
            .base_url
            .join(&format!("keyword/{ticker}/limit/1"))
            .map_err(|e| RotundaError::invalid_arg(e.to_string()))?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RotundaError::transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(RotundaError::from_status(status.as_u16(), None));
        }
        let parsed: DirectoryResponse = response
            .json()
            .await
            .map_err(|e| RotundaError::parse(e.to_string()))?;

        // Prefer an exact symbol match; fall back to the first hit.
        let exact = parsed
            .results
            .iter()
            .find(|entry| entry.symbol.eq_ignore_ascii_case(ticker))
            .and_then(|entry| entry.name.clone());
        Ok(exact.or_else(|| parsed.results.into_iter().find_map(|entry| entry.name)))
    }
}

impl Default for TickerDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompanyNameProvider for TickerDirectory {
    async fn company_name(&self, ticker: &str) -> Result<Option<String>, RotundaError> {
        let ticker = ticker.trim().to_ascii_uppercase();
        if ticker.is_empty() {
            return Ok(None);
        }
        if let Some(hit) = self.memo.lock().await.get(&ticker) {
            return Ok(hit.clone());
        }
        let found = self.fetch_name(&ticker).await?;
        self.memo.lock().await.insert(ticker, found.clone());
        Ok(found)
    }
}
