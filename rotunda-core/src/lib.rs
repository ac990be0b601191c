//! rotunda-core
//!
//! Core traits and utilities shared across the rotunda ecosystem.
//!
//! - `connector`: the `SourceConnector` trait and capability role traits.
//! - `error`: the unified error taxonomy.
//! - `fingerprint`: source-agnostic cache keys derived from logical queries.
//! - `paging`: the pagination driver.
//! - `records`: de-duplication and client-side filtering.
//! - `session`: the trading-session calendar behind freshness decisions.
//! - `middleware`: the trait implemented by connector wrappers.
//!
//! This crate assumes the Tokio ecosystem as the async runtime; connector
//! traits are `async_trait` object traits and the pagination driver produces
//! `futures` streams.
#![warn(missing_docs)]

/// Connector capability traits and the primary `SourceConnector` interface.
pub mod connector;
mod error;
mod fingerprint;
/// Middleware trait implemented by connector wrappers.
pub mod middleware;
/// Pagination driver over page-at-a-time providers.
pub mod paging;
/// De-duplication and filtering of normalized records.
pub mod records;
/// Trading-session calendar.
pub mod session;

pub use connector::{
    CompanyNameProvider, OptionChainProvider, SourceConnector, TradeFeedProvider,
};
pub use error::RotundaError;
pub use fingerprint::Fingerprint;
pub use middleware::Middleware;
pub use paging::Paginator;
pub use records::{apply_trade_query, dedupe_contracts, dedupe_trades, matches_trade_query};
pub use session::TradingCalendar;
