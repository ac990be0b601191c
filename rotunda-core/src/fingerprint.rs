use chrono::NaiveDate;
use rotunda_types::{ChainQuery, DataCategory, TradeQuery};

/// Deterministic cache key derived from a logical query.
///
/// Built from the data category and the canonicalized filters only, never
/// from the source that ends up serving the response, so cache hits are
/// source-agnostic from the caller's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// Trade-disclosure query.
    Trades(TradeQuery),
    /// Options-chain query.
    Chain(ChainQuery),
}

impl Fingerprint {
    /// Fingerprint for a trade query.
    #[must_use]
    pub fn trades(query: &TradeQuery) -> Self {
        Self::Trades(query.canonicalized())
    }

    /// Fingerprint for a chain query.
    #[must_use]
    pub fn chain(query: &ChainQuery) -> Self {
        Self::Chain(query.canonicalized())
    }

    /// The category this fingerprint belongs to.
    #[must_use]
    pub const fn category(&self) -> DataCategory {
        match self {
            Self::Trades(_) => DataCategory::Trades,
            Self::Chain(_) => DataCategory::OptionChain,
        }
    }

    /// Whether the query's date range lies entirely before `today`, meaning
    /// the answer can no longer change and qualifies for the longest cache
    /// lifetime.
    #[must_use]
    pub fn is_historical(&self, today: NaiveDate) -> bool {
        match self {
            Self::Trades(q) => q.until.is_some_and(|until| until < today),
            // Chain snapshots are always live quotes.
            Self::Chain(_) => false,
        }
    }
}
