//! De-duplication and client-side filtering of normalized records.

use std::collections::HashMap;

use rotunda_types::{ContractSnapshot, TradeQuery, TradeRecord};

/// Collapse duplicate trade records by identity key, latest-wins.
///
/// A later duplicate replaces an earlier one when its disclosure date is the
/// same or newer; first-occurrence order is preserved so upstream ordering
/// survives the merge.
#[must_use]
pub fn dedupe_trades(records: Vec<TradeRecord>) -> Vec<TradeRecord> {
    let mut index: HashMap<_, usize> = HashMap::with_capacity(records.len());
    let mut out: Vec<TradeRecord> = Vec::with_capacity(records.len());
    for record in records {
        match index.get(&record.key()) {
            Some(&at) => {
                if record.disclosure_date >= out[at].disclosure_date {
                    out[at] = record;
                }
            }
            None => {
                index.insert(record.key(), out.len());
                out.push(record);
            }
        }
    }
    out
}

/// Collapse duplicate contract snapshots by contract symbol, latest-wins.
#[must_use]
pub fn dedupe_contracts(records: Vec<ContractSnapshot>) -> Vec<ContractSnapshot> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut out: Vec<ContractSnapshot> = Vec::with_capacity(records.len());
    for record in records {
        match index.get(record.key()) {
            Some(&at) => out[at] = record,
            None => {
                index.insert(record.key().to_string(), out.len());
                out.push(record);
            }
        }
    }
    out
}

/// Whether a record satisfies every filter of `query`.
///
/// Used to post-filter sources that cannot filter server-side (the HTML
/// document endpoint returns everything it renders).
#[must_use]
pub fn matches_trade_query(record: &TradeRecord, query: &TradeQuery) -> bool {
    if !query.tickers.is_empty()
        && !query
            .tickers
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&record.ticker))
    {
        return false;
    }
    if !query.politicians.is_empty()
        && !query
            .politicians
            .iter()
            .any(|p| p.eq_ignore_ascii_case(&record.politician.name))
    {
        return false;
    }
    if let Some(tx) = query.transaction
        && tx != record.transaction
    {
        return false;
    }
    query.contains_date(record.trade_date)
}

/// Retain only records matching `query`, preserving order.
#[must_use]
pub fn apply_trade_query(records: Vec<TradeRecord>, query: &TradeQuery) -> Vec<TradeRecord> {
    records
        .into_iter()
        .filter(|r| matches_trade_query(r, query))
        .collect()
}
