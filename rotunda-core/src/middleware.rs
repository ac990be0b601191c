//! Middleware trait for wrapping [`SourceConnector`] implementations.

use std::sync::Arc;

use crate::connector::SourceConnector;

/// Trait implemented by connector middleware layers.
///
/// A middleware consumes an inner connector and returns a wrapped connector
/// that augments or restricts behavior (rate limiting, retries, cooldown).
pub trait Middleware: Send + Sync {
    /// Apply this middleware to wrap an inner connector and return the
    /// wrapped connector.
    fn apply(self: Box<Self>, inner: Arc<dyn SourceConnector>) -> Arc<dyn SourceConnector>;

    /// Human-readable middleware name for introspection/logging.
    fn name(&self) -> &'static str;

    /// Opaque configuration snapshot for serialization/inspection.
    fn config_json(&self) -> serde_json::Value;
}
