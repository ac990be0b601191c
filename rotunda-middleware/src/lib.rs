#![doc = include_str!("../README.md")]

mod builder;
mod cache;
mod cooldown;
mod limit;
mod retry;

pub use crate::builder::ConnectorBuilder;
pub use crate::cache::{CacheLookup, ResponseCache};
pub use crate::cooldown::{CooldownConnector, CooldownMiddleware};
pub use crate::limit::{RateLimitMiddleware, RateLimitedConnector, RateLimiter};
pub use crate::retry::{RetryMiddleware, RetryPolicy, RetryingConnector};
