use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::source::SourceKey;

/// Where a response was ultimately served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServedFrom {
    /// A live upstream fetch performed for this request.
    Upstream,
    /// A fresh cache entry.
    Cache,
    /// An expired cache entry served as a degraded response after every
    /// upstream failed.
    StaleCache,
}

/// The outcome of one successful acquisition: normalized records plus
/// provenance.
///
/// `partial` marks a result truncated by a pagination safety cap: the upstream
/// had more data and returned no error. An empty `records` vector with
/// `partial == false` is a legitimate "nothing matched" outcome, not a
/// failure.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult<R> {
    /// Normalized records in upstream order.
    pub records: Vec<R>,
    /// The source that served this response.
    pub source: SourceKey,
    /// When the upstream fetch completed.
    pub fetched_at: DateTime<Utc>,
    /// Whether a safety cap truncated the full logical dataset.
    pub partial: bool,
    /// How this response reached the caller.
    pub served: ServedFrom,
}

impl<R> FetchResult<R> {
    /// A complete (non-partial) upstream result stamped with the current time.
    #[must_use]
    pub fn new(records: Vec<R>, source: SourceKey) -> Self {
        Self {
            records,
            source,
            fetched_at: Utc::now(),
            partial: false,
            served: ServedFrom::Upstream,
        }
    }

    /// Mark the result as truncated by a safety cap.
    #[must_use]
    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Re-tag how the response was served.
    #[must_use]
    pub fn served(mut self, served: ServedFrom) -> Self {
        self.served = served;
        self
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the result carries no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
