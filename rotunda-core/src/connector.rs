use async_trait::async_trait;

use crate::RotundaError;
pub use rotunda_types::SourceKey;
use rotunda_types::{ChainPage, ChainQuery, DataCategory, PageRequest, TradePage, TradeQuery};

/// Focused role trait for sources that serve congressional trade disclosures.
///
/// Implementations return one page per call; the pagination driver owns the
/// continuation loop and the safety cap.
#[async_trait]
pub trait TradeFeedProvider: Send + Sync {
    /// Fetch one page of normalized trade records matching `query`.
    async fn trades_page(
        &self,
        query: &TradeQuery,
        page: PageRequest,
    ) -> Result<TradePage, RotundaError>;

    /// Largest page size the upstream accepts. The driver clamps requests to
    /// this.
    fn max_page_size(&self) -> usize {
        100
    }
}

/// Focused role trait for sources that serve options-chain snapshots.
#[async_trait]
pub trait OptionChainProvider: Send + Sync {
    /// Fetch one page of contract snapshots matching `query`.
    async fn chain_page(
        &self,
        query: &ChainQuery,
        page: PageRequest,
    ) -> Result<ChainPage, RotundaError>;

    /// Largest page size the upstream accepts.
    fn max_page_size(&self) -> usize {
        100
    }
}

/// Lookup seam for the external ticker → company-name collaborator.
///
/// Lookups are opportunistic: `Ok(None)` means "unknown", and callers must
/// tolerate it without failing the surrounding fetch.
#[async_trait]
pub trait CompanyNameProvider: Send + Sync {
    /// Resolve a company name for a ticker, if the directory knows one.
    async fn company_name(&self, ticker: &str) -> Result<Option<String>, RotundaError>;
}

/// Main connector trait implemented by source crates. Exposes capability
/// discovery and a cheap availability probe.
#[async_trait]
pub trait SourceConnector: Send + Sync {
    /// A stable identifier for priority lists (e.g. `"capitoltrades-bff"`).
    fn name(&self) -> &'static str;

    /// Canonical source key constructed from the static name.
    fn key(&self) -> SourceKey {
        SourceKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Whether this connector claims to serve the given data category.
    ///
    /// Default: `false` for all categories; connectors must override.
    fn supports(&self, category: DataCategory) -> bool {
        let _ = category;
        false
    }

    /// Cheap reachability probe. Must not consume meaningful quota and must
    /// not error; a probe that cannot tell reports `true` and lets the fetch
    /// attempt decide.
    async fn is_available(&self) -> bool {
        true
    }

    /// Advertise the trade-feed capability by returning a usable trait object
    /// when supported.
    fn as_trade_feed_provider(&self) -> Option<&dyn TradeFeedProvider> {
        None
    }

    /// Advertise the option-chain capability by returning a usable trait
    /// object when supported.
    fn as_option_chain_provider(&self) -> Option<&dyn OptionChainProvider> {
        None
    }

    /// If implemented, returns a trait object for company-name lookups.
    fn as_company_name_provider(&self) -> Option<&dyn CompanyNameProvider> {
        None
    }
}

/// Generate `as_*_provider` accessors for a wrapper that implements
/// `SourceConnector` by delegating capability discovery to an inner field.
///
/// The wrapper must implement each role trait itself (that is where it hooks
/// its behavior); the accessors only advertise what the inner connector
/// supports.
#[macro_export]
macro_rules! rotunda_connector_accessors {
    ($inner:ident) => {
        fn as_trade_feed_provider(&self) -> Option<&dyn $crate::connector::TradeFeedProvider> {
            if self.$inner.as_trade_feed_provider().is_some() {
                Some(self as &dyn $crate::connector::TradeFeedProvider)
            } else {
                None
            }
        }
        fn as_option_chain_provider(&self) -> Option<&dyn $crate::connector::OptionChainProvider> {
            if self.$inner.as_option_chain_provider().is_some() {
                Some(self as &dyn $crate::connector::OptionChainProvider)
            } else {
                None
            }
        }
        fn as_company_name_provider(
            &self,
        ) -> Option<&dyn $crate::connector::CompanyNameProvider> {
            if self.$inner.as_company_name_provider().is_some() {
                Some(self as &dyn $crate::connector::CompanyNameProvider)
            } else {
                None
            }
        }
    };
}
