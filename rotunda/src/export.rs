//! Flat, tabular-ready views of normalized results for presentation layers
//! (table rendering, CSV download) that must stay free of upstream-specific
//! knowledge.

use rotunda_types::{ContractSnapshot, TradeRecord};

use crate::manager::DataResponse;

/// Column order for trade-disclosure rows.
pub const TRADE_COLUMNS: &[&str] = &[
    "politician",
    "party",
    "chamber",
    "state",
    "ticker",
    "company",
    "transaction",
    "trade_date",
    "disclosure_date",
    "reporting_delay_days",
    "size",
    "price",
    "owner",
];

/// Column order for contract-snapshot rows.
pub const CONTRACT_COLUMNS: &[&str] = &[
    "contract",
    "underlying",
    "type",
    "strike",
    "expiry",
    "bid",
    "ask",
    "last",
    "open_interest",
    "volume",
    "implied_volatility",
];

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Flatten trade records into [`TRADE_COLUMNS`]-ordered string rows.
#[must_use]
pub fn trade_rows(records: &[TradeRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.politician.name.clone(),
                r.politician.party.as_str().to_string(),
                r.politician.chamber.as_str().to_string(),
                r.politician.state.clone(),
                r.ticker.clone(),
                opt(&r.company),
                r.transaction.as_str().to_string(),
                r.trade_date.to_string(),
                r.disclosure_date.to_string(),
                r.reporting_delay_days().to_string(),
                opt(&r.size_bracket),
                opt(&r.price),
                r.owner.as_str().to_string(),
            ]
        })
        .collect()
}

/// Flatten contract snapshots into [`CONTRACT_COLUMNS`]-ordered string rows.
#[must_use]
pub fn contract_rows(records: &[ContractSnapshot]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|c| {
            vec![
                c.contract.clone(),
                c.underlying.clone(),
                c.contract_type.as_str().to_string(),
                c.strike.to_string(),
                c.expiry.to_string(),
                opt(&c.bid),
                opt(&c.ask),
                opt(&c.last),
                opt(&c.open_interest),
                opt(&c.volume),
                opt(&c.implied_volatility),
            ]
        })
        .collect()
}

fn csv_from(columns: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(columns)
        .expect("in-memory csv write cannot fail");
    for row in rows {
        writer
            .write_record(&row)
            .expect("in-memory csv write cannot fail");
    }
    let bytes = writer.into_inner().expect("in-memory csv flush cannot fail");
    String::from_utf8(bytes).expect("csv output is utf-8")
}

impl DataResponse {
    /// Column names for [`Self::rows`].
    #[must_use]
    pub const fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Trades(_) => TRADE_COLUMNS,
            Self::OptionChain(_) => CONTRACT_COLUMNS,
        }
    }

    /// Flatten the payload into column-ordered string rows.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<String>> {
        match self {
            Self::Trades(result) => trade_rows(&result.records),
            Self::OptionChain(result) => contract_rows(&result.records),
        }
    }

    /// Render the payload as a CSV document with a header row.
    #[must_use]
    pub fn to_csv_string(&self) -> String {
        csv_from(self.columns(), self.rows())
    }
}
