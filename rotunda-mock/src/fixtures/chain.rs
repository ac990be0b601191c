use chrono::NaiveDate;
use rust_decimal::Decimal;
use rotunda_types::{ContractSnapshot, ContractType};

fn contract(
    symbol: &str,
    underlying: &str,
    side: ContractType,
    strike: i64,
    bid: &str,
    ask: &str,
) -> ContractSnapshot {
    ContractSnapshot {
        contract: symbol.to_string(),
        underlying: underlying.to_string(),
        contract_type: side,
        strike: Decimal::from(strike),
        expiry: NaiveDate::from_ymd_opt(2025, 12, 19).expect("valid fixture date"),
        bid: bid.parse().ok(),
        ask: ask.parse().ok(),
        last: None,
        open_interest: Some(1200),
        volume: Some(340),
        implied_volatility: Some(0.31),
    }
}

pub fn for_underlying(symbol: &str) -> Vec<ContractSnapshot> {
    match symbol {
        "AAPL" => vec![
            contract("AAPL251219C00180000", "AAPL", ContractType::Call, 180, "12.10", "12.45"),
            contract("AAPL251219C00200000", "AAPL", ContractType::Call, 200, "4.80", "5.05"),
            contract("AAPL251219P00180000", "AAPL", ContractType::Put, 180, "6.20", "6.55"),
            contract("AAPL251219P00160000", "AAPL", ContractType::Put, 160, "2.35", "2.60"),
        ],
        "MSFT" => vec![
            contract("MSFT251219C00420000", "MSFT", ContractType::Call, 420, "18.60", "19.10"),
            contract("MSFT251219P00380000", "MSFT", ContractType::Put, 380, "9.40", "9.85"),
        ],
        _ => vec![],
    }
}
