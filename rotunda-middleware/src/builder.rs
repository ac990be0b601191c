//! Builder for composing connectors with middleware layers.
//!
//! Layers form an onion around the raw connector. The `layers` vector stores
//! middleware outermost-first for intuitive builder semantics (last added =
//! outermost) and is applied in reverse during `build()`:
//!
//! ```text
//! builder.with_rate_limit(..).with_retry(..).with_cooldown(..)
//!
//! Storage: [Cooldown, Retry, RateLimit]   (outermost first)
//! Result:  Cooldown(Retry(RateLimit(Raw)))
//! ```
//!
//! That ordering is the one the connector presets use: the cooldown check runs
//! first and observes errors last, each retry attempt re-acquires a limiter
//! slot, and the limiter sits closest to the wire so every network call is
//! accounted.

use std::sync::Arc;

use rotunda_core::Middleware;
use rotunda_core::connector::SourceConnector;
use rotunda_types::{CooldownConfig, RateLimitConfig, RetryConfig};

use crate::cooldown::CooldownMiddleware;
use crate::limit::RateLimitMiddleware;
use crate::retry::RetryMiddleware;

/// Generic middleware builder for composing a connector with layered
/// wrappers.
pub struct ConnectorBuilder {
    raw: Arc<dyn SourceConnector>,
    /// Middleware layers in outermost-first order.
    layers: Vec<Box<dyn Middleware>>,
}

impl ConnectorBuilder {
    /// Create a builder from a raw, unwrapped connector.
    #[must_use]
    pub fn new(raw: Arc<dyn SourceConnector>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    fn replace(&mut self, name: &'static str, layer: Box<dyn Middleware>) {
        self.layers.retain(|m| m.name() != name);
        self.layers.insert(0, layer);
    }

    /// Add or replace the rate-limit layer.
    #[must_use]
    pub fn with_rate_limit(mut self, cfg: &RateLimitConfig) -> Self {
        self.replace(
            "RateLimitedConnector",
            Box::new(RateLimitMiddleware::new(cfg.clone())),
        );
        self
    }

    /// Add or replace the retry layer.
    #[must_use]
    pub fn with_retry(mut self, cfg: RetryConfig) -> Self {
        self.replace("RetryingConnector", Box::new(RetryMiddleware::new(cfg)));
        self
    }

    /// Add or replace the cooldown layer.
    #[must_use]
    pub fn with_cooldown(mut self, cfg: CooldownConfig) -> Self {
        self.replace("CooldownConnector", Box::new(CooldownMiddleware::new(cfg)));
        self
    }

    /// Add an arbitrary middleware at the outermost position.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// Snapshot the configured stack for introspection/logging, outermost
    /// first, with the raw connector documented as the innermost layer.
    #[must_use]
    pub fn describe(&self) -> Vec<(String, serde_json::Value)> {
        let mut out: Vec<(String, serde_json::Value)> = self
            .layers
            .iter()
            .map(|l| (l.name().to_string(), l.config_json()))
            .collect();
        out.push((
            "RawConnector".to_string(),
            serde_json::json!({ "name": self.raw.name() }),
        ));
        out
    }

    /// Apply layers innermost-to-outermost and return the wrapped connector.
    #[must_use]
    pub fn build(self) -> Arc<dyn SourceConnector> {
        let mut acc: Arc<dyn SourceConnector> = Arc::clone(&self.raw);
        for m in self.layers.into_iter().rev() {
            acc = m.apply(acc);
        }
        acc
    }
}
