//! Rotunda reconciles heterogeneous, unreliable, rate-limited upstream
//! sources of time-sensitive financial records into a single consistent view.
//!
//! Overview
//! - Routes requests to sources implementing the `rotunda_core` contracts,
//!   strictly in priority order; the first success wins, everything attempted
//!   keeps its recorded failure reason.
//! - Each source carries its own rate limiter, retry policy, and cooldown;
//!   budgets are never shared across sources.
//! - Responses land in a fingerprint-keyed cache whose lifetimes follow the
//!   trading session; after a total upstream failure a retained stale entry
//!   is served as an explicitly tagged degraded response.
//! - Identical concurrent requests collapse to a single upstream fetch, and
//!   total upstream concurrency is bounded by a worker pool.
//!
//! Building an engine over the Capitol Trades sources:
//! ```rust,ignore
//! use std::sync::Arc;
//! use rotunda::{FetchOptions, Rotunda, TickerDirectory};
//! use rotunda_capitoltrades::{CapitolBffConnector, CapitolHtmlConnector};
//! use rotunda_types::TradeQuery;
//!
//! let engine = Rotunda::builder()
//!     .with_connector(CapitolHtmlConnector::rate_limited().build())
//!     .with_connector(CapitolBffConnector::rate_limited().build())
//!     .with_name_lookup(Arc::new(TickerDirectory::new()))
//!     .build()?;
//!
//! let result = engine.trades(&TradeQuery::unfiltered(), FetchOptions::default()).await?;
//! println!("{} records via {}", result.len(), result.source);
//! ```
#![warn(missing_docs)]

mod core;
mod enrich;
/// Tabular and CSV views of normalized results.
pub mod export;
mod manager;

pub use crate::core::{Rotunda, RotundaBuilder};
pub use crate::enrich::TickerDirectory;
pub use crate::manager::{DataRequest, DataResponse, FetchOptions};

pub use rotunda_core::{Fingerprint, RotundaError, TradingCalendar};
pub use rotunda_types::{
    CacheConfig, CacheStatus, ChainQuery, ContractSnapshot, DataCategory, EntryStatus,
    FetchResult, PagingConfig, ServedFrom, SourceKey, TradeQuery, TradeRecord,
};
