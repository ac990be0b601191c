//! Shared data transfer objects and configuration primitives for the rotunda
//! acquisition engine.
#![warn(missing_docs)]

mod config;
mod page;
mod query;
mod record;
mod result;
mod source;

pub use config::{
    CacheConfig, CacheStatus, CooldownConfig, EntryStatus, PagingConfig, QuotaState,
    RateLimitConfig, RetryConfig, RotundaConfig, TtlPolicy,
};
pub use page::{ChainPage, PageRequest, PageToken, TradePage};
pub use query::{ChainQuery, DataCategory, TradeQuery};
pub use record::{
    Chamber, ContractSnapshot, ContractType, Owner, Party, Politician, TradeKey, TradeRecord,
    TransactionType,
};
pub use result::{FetchResult, ServedFrom};
pub use source::SourceKey;
