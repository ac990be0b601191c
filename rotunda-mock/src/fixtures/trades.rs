use chrono::NaiveDate;
use rotunda_types::{
    Chamber, Owner, Party, Politician, TradeQuery, TradeRecord, TransactionType,
};

fn politician(name: &str, party: Party, chamber: Chamber, state: &str) -> Politician {
    Politician {
        name: name.to_string(),
        party,
        chamber,
        state: state.to_string(),
        district: None,
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
}

#[allow(clippy::too_many_arguments)]
fn trade(
    who: Politician,
    ticker: &str,
    company: &str,
    tx: TransactionType,
    traded: NaiveDate,
    disclosed: NaiveDate,
    bracket: &str,
    owner: Owner,
) -> TradeRecord {
    TradeRecord {
        politician: who,
        ticker: ticker.to_string(),
        company: Some(company.to_string()),
        sector: None,
        transaction: tx,
        trade_date: traded,
        disclosure_date: disclosed,
        size_bracket: Some(bracket.to_string()),
        price: None,
        owner,
    }
}

pub fn all() -> Vec<TradeRecord> {
    vec![
        trade(
            politician("Nancy Pelosi", Party::Democrat, Chamber::House, "CA"),
            "AAPL",
            "Apple Inc.",
            TransactionType::Buy,
            day(2025, 5, 2),
            day(2025, 5, 14),
            "250K–500K",
            Owner::Spouse,
        ),
        trade(
            politician("Dan Crenshaw", Party::Republican, Chamber::House, "TX"),
            "NVDA",
            "NVIDIA Corp",
            TransactionType::Sell,
            day(2025, 5, 6),
            day(2025, 5, 20),
            "15K–50K",
            Owner::Filer,
        ),
        trade(
            politician("Josh Gottheimer", Party::Democrat, Chamber::House, "NJ"),
            "MSFT",
            "Microsoft Corp",
            TransactionType::Buy,
            day(2025, 5, 9),
            day(2025, 5, 23),
            "1K–15K",
            Owner::Joint,
        ),
        trade(
            politician("Tommy Tuberville", Party::Republican, Chamber::Senate, "AL"),
            "AAPL",
            "Apple Inc.",
            TransactionType::Sell,
            day(2025, 5, 12),
            day(2025, 6, 2),
            "15K–50K",
            Owner::Filer,
        ),
        trade(
            politician("Nancy Pelosi", Party::Democrat, Chamber::House, "CA"),
            "GOOGL",
            "Alphabet Inc.",
            TransactionType::Buy,
            day(2025, 5, 15),
            day(2025, 5, 28),
            "50K–100K",
            Owner::Spouse,
        ),
        trade(
            politician("Mark Green", Party::Republican, Chamber::House, "TN"),
            "KO",
            "Coca-Cola",
            TransactionType::Receive,
            day(2025, 5, 16),
            day(2025, 6, 5),
            "1K–15K",
            Owner::Child,
        ),
    ]
}

pub fn matching(query: &TradeQuery) -> Vec<TradeRecord> {
    all()
        .into_iter()
        .filter(|r| rotunda_core::matches_trade_query(r, query))
        .collect()
}
