//! Wire shapes of the Capitol Trades payloads and their normalization into
//! [`TradeRecord`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use rotunda_core::RotundaError;
use rotunda_types::{Chamber, Owner, Party, Politician, TradeRecord, TransactionType};

#[derive(Debug, Deserialize)]
pub(crate) struct TradesEnvelope {
    #[serde(default)]
    pub meta: Option<Meta>,
    pub data: Vec<RawTrade>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Meta {
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Paging {
    pub page: u32,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTrade {
    pub politician: RawPolitician,
    pub asset: RawAsset,
    pub tx_type: String,
    pub tx_date: String,
    #[serde(default)]
    pub pub_date: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPolitician {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub chamber: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawAsset {
    #[serde(default)]
    pub asset_ticker: Option<String>,
    #[serde(default)]
    pub instrument: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, RotundaError> {
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .map_err(|e| RotundaError::parse(format!("bad {field} {raw:?}: {e}")))
}

fn parse_party(raw: Option<&str>) -> Party {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("democrat") => Party::Democrat,
        Some("republican") => Party::Republican,
        Some("independent") => Party::Independent,
        _ => Party::Other,
    }
}

fn parse_chamber(raw: Option<&str>) -> Chamber {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("senate") => Chamber::Senate,
        _ => Chamber::House,
    }
}

impl RawTrade {
    /// Normalize one wire record. Records without any ticker are dropped by
    /// the caller; structural violations are parse failures.
    pub(crate) fn normalize(self) -> Result<Option<TradeRecord>, RotundaError> {
        // The feed lists bonds and funds without a ticker; those cannot carry
        // an identity key and are skipped, not fabricated.
        let Some(raw_ticker) = self.asset.asset_ticker.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        // Tickers arrive suffixed with the listing venue ("AAPL:US").
        let ticker = raw_ticker
            .split(':')
            .next()
            .unwrap_or(raw_ticker.as_str())
            .to_ascii_uppercase();

        let trade_date = parse_date(&self.tx_date, "txDate")?;
        let disclosure_date = match self.pub_date.as_deref() {
            Some(raw) => parse_date(raw, "pubDate")?,
            // Filed-but-unpublished rows fall back to the trade date rather
            // than inventing a delay.
            None => trade_date,
        };

        let politician = Politician {
            name: format!("{} {}", self.politician.first_name, self.politician.last_name),
            party: parse_party(self.politician.party.as_deref()),
            chamber: parse_chamber(self.politician.chamber.as_deref()),
            state: self.politician.state.unwrap_or_default(),
            district: self.politician.district,
        };

        Ok(Some(TradeRecord {
            politician,
            ticker,
            company: self.asset.instrument.filter(|s| !s.is_empty()),
            sector: self.asset.sector.filter(|s| !s.is_empty()),
            transaction: TransactionType::parse(&self.tx_type),
            trade_date,
            disclosure_date,
            size_bracket: self.size.filter(|s| !s.is_empty()),
            price: self.price.and_then(Decimal::from_f64_retain),
            owner: self
                .owner
                .as_deref()
                .map_or(Owner::Undisclosed, Owner::parse),
        }))
    }
}

/// Normalize a batch, dropping ticker-less rows and surfacing the first
/// structural violation.
pub(crate) fn normalize_all(raw: Vec<RawTrade>) -> Result<Vec<TradeRecord>, RotundaError> {
    let mut out = Vec::with_capacity(raw.len());
    for item in raw {
        if let Some(record) = item.normalize()? {
            out.push(record);
        }
    }
    Ok(out)
}
