use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Congressional chamber of the filer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Chamber {
    /// House of Representatives.
    House,
    /// Senate.
    Senate,
}

impl Chamber {
    /// Stable lowercase label for logs and export.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Senate => "senate",
        }
    }
}

/// Party affiliation of the filer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Party {
    /// Democratic party.
    Democrat,
    /// Republican party.
    Republican,
    /// Independent or minor party.
    Independent,
    /// Affiliation not disclosed by the upstream.
    Other,
}

impl Party {
    /// Stable lowercase label for logs and export.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Democrat => "democrat",
            Self::Republican => "republican",
            Self::Independent => "independent",
            Self::Other => "other",
        }
    }
}

/// The politician who filed a disclosure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Politician {
    /// Full display name as published.
    pub name: String,
    /// Party affiliation.
    pub party: Party,
    /// Chamber the filer sits in.
    pub chamber: Chamber,
    /// Two-letter state code.
    pub state: String,
    /// House district, when applicable.
    pub district: Option<String>,
}

/// Disclosed transaction direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TransactionType {
    /// Purchase.
    Buy,
    /// Sale (full or partial).
    Sell,
    /// Exchange of one holding for another.
    Exchange,
    /// Receipt (gift, inheritance, grant).
    Receive,
    /// Direction published but not one of the known kinds.
    Other,
}

impl TransactionType {
    /// Parse an upstream direction label; unknown labels map to [`Self::Other`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "buy" | "purchase" => Self::Buy,
            "sell" | "sale" | "sell (full)" | "sell (partial)" => Self::Sell,
            "exchange" => Self::Exchange,
            "receive" | "received" => Self::Receive,
            _ => Self::Other,
        }
    }

    /// Stable lowercase label for logs and export.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Exchange => "exchange",
            Self::Receive => "receive",
            Self::Other => "other",
        }
    }
}

/// Who owns the traded asset, relative to the filer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Owner {
    /// The filer themselves.
    Filer,
    /// The filer's spouse.
    Spouse,
    /// A joint account.
    Joint,
    /// A dependent child.
    Child,
    /// Ownership not disclosed.
    Undisclosed,
}

impl Owner {
    /// Parse an upstream owner label; unknown labels map to [`Self::Undisclosed`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "self" => Self::Filer,
            "spouse" => Self::Spouse,
            "joint" => Self::Joint,
            "child" | "dependent" => Self::Child,
            _ => Self::Undisclosed,
        }
    }

    /// Stable lowercase label for logs and export.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filer => "self",
            Self::Spouse => "spouse",
            Self::Joint => "joint",
            Self::Child => "child",
            Self::Undisclosed => "undisclosed",
        }
    }
}

/// Identity key of a [`TradeRecord`] within one fetch result set.
///
/// Two records with the same key describe the same disclosed trade; duplicates
/// from a single upstream are merged latest-wins by disclosure date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TradeKey {
    /// Filer name, case-folded.
    pub politician: String,
    /// Ticker symbol, upper-cased.
    pub ticker: String,
    /// Date the trade was executed.
    pub trade_date: NaiveDate,
    /// Transaction direction.
    pub transaction: TransactionType,
}

/// A normalized congressional trade disclosure.
///
/// Instances are immutable once constructed; connectors build fresh records on
/// every successful fetch. Fields the upstream did not publish are `None`,
/// never silently dropped or fabricated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// The filer.
    pub politician: Politician,
    /// Ticker symbol of the traded asset, upper-cased.
    pub ticker: String,
    /// Company name, when known or enriched.
    pub company: Option<String>,
    /// Sector label, when published.
    pub sector: Option<String>,
    /// Transaction direction.
    pub transaction: TransactionType,
    /// Date the trade was executed.
    pub trade_date: NaiveDate,
    /// Date the trade was disclosed.
    pub disclosure_date: NaiveDate,
    /// Disclosed size bracket, e.g. `"1K–15K"`.
    pub size_bracket: Option<String>,
    /// Disclosed unit price, when published.
    pub price: Option<Decimal>,
    /// Asset owner relative to the filer.
    pub owner: Owner,
}

impl TradeRecord {
    /// Identity key used for de-duplication and merge decisions.
    #[must_use]
    pub fn key(&self) -> TradeKey {
        TradeKey {
            politician: self.politician.name.to_lowercase(),
            ticker: self.ticker.to_ascii_uppercase(),
            trade_date: self.trade_date,
            transaction: self.transaction,
        }
    }

    /// Days between execution and disclosure.
    #[must_use]
    pub fn reporting_delay_days(&self) -> i64 {
        (self.disclosure_date - self.trade_date).num_days()
    }
}

/// Option contract side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    /// Call option.
    Call,
    /// Put option.
    Put,
}

impl ContractType {
    /// Stable lowercase label for logs and export.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

/// A normalized point-in-time snapshot of one option contract.
///
/// The contract symbol is the identity key: unique within a fetch result set.
/// Quote fields the upstream omitted are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSnapshot {
    /// OCC-style contract symbol, e.g. `"AAPL261218C00150000"`.
    pub contract: String,
    /// Underlying ticker symbol.
    pub underlying: String,
    /// Call or put.
    pub contract_type: ContractType,
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiry: NaiveDate,
    /// Best bid, when quoted.
    pub bid: Option<Decimal>,
    /// Best ask, when quoted.
    pub ask: Option<Decimal>,
    /// Last traded price, when available.
    pub last: Option<Decimal>,
    /// Open interest, when published.
    pub open_interest: Option<u64>,
    /// Session volume, when published.
    pub volume: Option<u64>,
    /// Implied volatility, when published.
    pub implied_volatility: Option<f64>,
}

impl ContractSnapshot {
    /// Identity key used for de-duplication.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.contract
    }
}
