use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::{ContractType, TransactionType};

/// Data category served by the engine. Drives routing, cache keying, and the
/// freshness policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DataCategory {
    /// Congressional trade disclosures.
    Trades,
    /// Options-chain snapshots.
    OptionChain,
}

impl DataCategory {
    /// Stable kebab-case identifier for logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trades => "trades",
            Self::OptionChain => "option-chain",
        }
    }
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters for a trade-disclosure query. Empty collections and `None` fields
/// mean "unfiltered".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeQuery {
    /// Restrict to these ticker symbols.
    #[serde(default)]
    pub tickers: Vec<String>,
    /// Restrict to these filer names.
    #[serde(default)]
    pub politicians: Vec<String>,
    /// Restrict to one transaction direction.
    pub transaction: Option<TransactionType>,
    /// Earliest trade date, inclusive.
    pub since: Option<NaiveDate>,
    /// Latest trade date, inclusive.
    pub until: Option<NaiveDate>,
}

impl TradeQuery {
    /// A query with no filters.
    #[must_use]
    pub fn unfiltered() -> Self {
        Self::default()
    }

    /// Canonical form: symbol and name sets sorted, de-duplicated, and
    /// case-folded so equivalent queries produce identical cache keys.
    #[must_use]
    pub fn canonicalized(&self) -> Self {
        let mut tickers: Vec<String> =
            self.tickers.iter().map(|t| t.to_ascii_uppercase()).collect();
        tickers.sort_unstable();
        tickers.dedup();
        let mut politicians: Vec<String> =
            self.politicians.iter().map(|p| p.to_lowercase()).collect();
        politicians.sort_unstable();
        politicians.dedup();
        Self {
            tickers,
            politicians,
            transaction: self.transaction,
            since: self.since,
            until: self.until,
        }
    }

    /// Whether `record_date` falls inside the query's date range.
    #[must_use]
    pub fn contains_date(&self, record_date: NaiveDate) -> bool {
        self.since.is_none_or(|d| record_date >= d) && self.until.is_none_or(|d| record_date <= d)
    }
}

/// Filters for an options-chain query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainQuery {
    /// Underlying ticker symbol.
    pub underlying: String,
    /// Restrict to one expiration date.
    pub expiry: Option<NaiveDate>,
    /// Restrict to calls or puts.
    pub contract_type: Option<ContractType>,
}

impl ChainQuery {
    /// Chain query for an underlying with no further filters.
    #[must_use]
    pub fn for_underlying(underlying: impl Into<String>) -> Self {
        Self {
            underlying: underlying.into(),
            expiry: None,
            contract_type: None,
        }
    }

    /// Canonical form with the underlying upper-cased.
    #[must_use]
    pub fn canonicalized(&self) -> Self {
        Self {
            underlying: self.underlying.to_ascii_uppercase(),
            expiry: self.expiry,
            contract_type: self.contract_type,
        }
    }
}
