//! Wire shapes of the chain endpoint and their normalization into
//! [`ContractSnapshot`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use rotunda_core::RotundaError;
use rotunda_types::{ContractSnapshot, ContractType};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChainEnvelope {
    pub results: Vec<RawContract>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawContract {
    pub contract: String,
    pub underlying: String,
    #[serde(rename = "type")]
    pub contract_type: String,
    pub strike: f64,
    pub expiry: String,
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub ask: Option<f64>,
    #[serde(default)]
    pub last: Option<f64>,
    #[serde(default)]
    pub open_interest: Option<u64>,
    #[serde(default)]
    pub volume: Option<u64>,
    #[serde(default)]
    pub implied_volatility: Option<f64>,
}

impl RawContract {
    pub(crate) fn normalize(self) -> Result<ContractSnapshot, RotundaError> {
        let contract_type = match self.contract_type.as_str() {
            "call" => ContractType::Call,
            "put" => ContractType::Put,
            other => {
                return Err(RotundaError::parse(format!(
                    "unknown contract type {other:?} for {}",
                    self.contract
                )));
            }
        };
        let strike = Decimal::from_f64_retain(self.strike)
            .ok_or_else(|| RotundaError::parse(format!("bad strike for {}", self.contract)))?;
        let expiry = NaiveDate::parse_from_str(&self.expiry, "%Y-%m-%d")
            .map_err(|e| RotundaError::parse(format!("bad expiry {:?}: {e}", self.expiry)))?;
        Ok(ContractSnapshot {
            contract: self.contract,
            underlying: self.underlying.to_ascii_uppercase(),
            contract_type,
            strike,
            expiry,
            bid: self.bid.and_then(Decimal::from_f64_retain),
            ask: self.ask.and_then(Decimal::from_f64_retain),
            last: self.last.and_then(Decimal::from_f64_retain),
            open_interest: self.open_interest,
            volume: self.volume,
            implied_volatility: self.implied_volatility,
        })
    }
}
