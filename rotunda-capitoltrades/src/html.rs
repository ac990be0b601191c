//! Connector for the public Capitol Trades HTML page.
//!
//! The page is a Next.js document; the rendered table is useless to a
//! non-browser client, but the full payload ships embedded in the
//! `__NEXT_DATA__` script tag. Extraction is plain string scanning plus a
//! JSON parse, so markup drift around the tag does not matter; only the tag
//! itself does.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use rotunda_core::RotundaError;
use rotunda_core::connector::{SourceConnector, TradeFeedProvider};
use rotunda_middleware::ConnectorBuilder;
use rotunda_types::{
    CooldownConfig, DataCategory, PageRequest, RateLimitConfig, RetryConfig, TradePage, TradeQuery,
};

use crate::client;
use crate::model::RawTrade;

const DEFAULT_PAGE_URL: &str = "https://www.capitoltrades.com/trades";
const NEXT_DATA_MARKER: &str = "id=\"__NEXT_DATA__\"";

/// HTML document connector. Serves one page worth of recent disclosures; no
/// pagination and no authentication.
pub struct CapitolHtmlConnector {
    http: reqwest::Client,
    page_url: Url,
}

impl CapitolHtmlConnector {
    /// Returns an unconfigured builder around the default connector.
    #[must_use]
    pub fn new() -> ConnectorBuilder {
        ConnectorBuilder::new(Arc::new(Self::new_raw()))
    }

    /// Returns a builder with a polite scrape cadence, default retries, and a
    /// five-minute cooldown already applied.
    #[must_use]
    pub fn rate_limited() -> ConnectorBuilder {
        ConnectorBuilder::new(Arc::new(Self::new_raw()))
            .with_rate_limit(&RateLimitConfig {
                max_calls: 10,
                window: Duration::from_secs(60),
                daily_cap: None,
            })
            .with_retry(RetryConfig::default())
            .with_cooldown(CooldownConfig::default())
    }

    /// Expert-only: construct an unwrapped connector for manual composition.
    #[must_use]
    pub fn new_raw() -> Self {
        Self::with_page_url(DEFAULT_PAGE_URL).expect("default page URL is valid")
    }

    /// Point the connector at a different document (tests, mirrors).
    ///
    /// # Errors
    /// Returns `InvalidArg` when `page_url` is not a valid URL.
    pub fn with_page_url(page_url: &str) -> Result<Self, RotundaError> {
        let page_url = Url::parse(page_url)
            .map_err(|e| RotundaError::invalid_arg(format!("bad page url {page_url:?}: {e}")))?;
        Ok(Self {
            http: client::build_client("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
            page_url,
        })
    }
}

/// Pull the JSON text out of the `__NEXT_DATA__` script tag.
fn extract_next_data(html: &str) -> Result<&str, RotundaError> {
    let tag_at = html
        .find(NEXT_DATA_MARKER)
        .ok_or_else(|| RotundaError::parse("__NEXT_DATA__ script tag not found"))?;
    let rest = &html[tag_at..];
    let body_at = rest
        .find('>')
        .ok_or_else(|| RotundaError::parse("unterminated __NEXT_DATA__ script tag"))?;
    let body = &rest[body_at + 1..];
    let end = body
        .find("</script>")
        .ok_or_else(|| RotundaError::parse("unterminated __NEXT_DATA__ payload"))?;
    Ok(&body[..end])
}

/// Parse the embedded payload down to the trade list.
fn parse_embedded_trades(html: &str) -> Result<Vec<RawTrade>, RotundaError> {
    let payload = extract_next_data(html)?;
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| RotundaError::parse(e.to_string()))?;
    let trades = value
        .pointer("/props/pageProps/trades")
        .ok_or_else(|| RotundaError::parse("embedded payload has no pageProps.trades"))?;
    serde_json::from_value(trades.clone()).map_err(|e| RotundaError::parse(e.to_string()))
}

#[async_trait]
impl SourceConnector for CapitolHtmlConnector {
    fn name(&self) -> &'static str {
        "capitoltrades-html"
    }
    fn vendor(&self) -> &'static str {
        "Capitol Trades"
    }
    fn supports(&self, category: DataCategory) -> bool {
        matches!(category, DataCategory::Trades)
    }

    async fn is_available(&self) -> bool {
        match self.http.get(self.page_url.clone()).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::warn!(error = %err, "capitol trades page unreachable");
                false
            }
        }
    }

    fn as_trade_feed_provider(&self) -> Option<&dyn TradeFeedProvider> {
        Some(self as &dyn TradeFeedProvider)
    }
}

#[async_trait]
impl TradeFeedProvider for CapitolHtmlConnector {
    async fn trades_page(
        &self,
        query: &TradeQuery,
        page: PageRequest,
    ) -> Result<TradePage, RotundaError> {
        // Single document; continuation requests have nothing more to serve.
        if page.token.is_some() {
            return Ok(TradePage::default());
        }
        tracing::debug!(url = %self.page_url, "fetching trades document");
        let response = self
            .http
            .get(self.page_url.clone())
            .send()
            .await
            .map_err(|e| client::transport(&e))?;
        let response = client::check_status(response)?;
        let html = response.text().await.map_err(|e| client::transport(&e))?;

        let raw = parse_embedded_trades(&html)?;
        let mut records =
            rotunda_core::apply_trade_query(crate::model::normalize_all(raw)?, query);
        records.truncate(page.limit);
        Ok(TradePage {
            records,
            next: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::extract_next_data;

    #[test]
    fn extraction_finds_the_payload_between_tags() {
        let html = r#"<html><body><script id="__NEXT_DATA__" type="application/json">{"a":1}</script></body></html>"#;
        assert_eq!(extract_next_data(html).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn extraction_fails_without_the_tag() {
        assert!(extract_next_data("<html></html>").is_err());
    }
}
