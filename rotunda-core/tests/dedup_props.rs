use chrono::NaiveDate;
use proptest::prelude::*;
use rotunda_core::dedupe_trades;
use rotunda_types::{Chamber, Owner, Party, Politician, TradeRecord, TransactionType};

fn record(name: &str, ticker: &str, trade_day: u32, disclosed_day: u32) -> TradeRecord {
    TradeRecord {
        politician: Politician {
            name: name.to_string(),
            party: Party::Democrat,
            chamber: Chamber::House,
            state: "CA".to_string(),
            district: None,
        },
        ticker: ticker.to_string(),
        company: None,
        sector: None,
        transaction: TransactionType::Buy,
        trade_date: NaiveDate::from_ymd_opt(2025, 5, trade_day).unwrap(),
        disclosure_date: NaiveDate::from_ymd_opt(2025, 6, disclosed_day).unwrap(),
        size_bracket: None,
        price: None,
        owner: Owner::Filer,
    }
}

#[test]
fn later_disclosure_wins_in_place() {
    let records = vec![
        record("Nancy Pelosi", "AAPL", 1, 5),
        record("Dan Crenshaw", "NVDA", 2, 6),
        record("Nancy Pelosi", "AAPL", 1, 9),
    ];
    let out = dedupe_trades(records);
    assert_eq!(out.len(), 2);
    // Merge keeps the first-occurrence position but the newer payload.
    assert_eq!(out[0].ticker, "AAPL");
    assert_eq!(
        out[0].disclosure_date,
        NaiveDate::from_ymd_opt(2025, 6, 9).unwrap()
    );
    assert_eq!(out[1].ticker, "NVDA");
}

#[test]
fn equal_disclosure_dates_prefer_the_later_record() {
    let mut a = record("Josh Gottheimer", "MSFT", 3, 7);
    a.size_bracket = Some("1K–15K".to_string());
    let mut b = record("Josh Gottheimer", "MSFT", 3, 7);
    b.size_bracket = Some("15K–50K".to_string());
    let out = dedupe_trades(vec![a, b]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].size_bracket.as_deref(), Some("15K–50K"));
}

#[test]
fn identity_is_case_insensitive() {
    let a = record("Nancy Pelosi", "aapl", 1, 5);
    let b = record("NANCY PELOSI", "AAPL", 1, 6);
    assert_eq!(dedupe_trades(vec![a, b]).len(), 1);
}

proptest! {
    #[test]
    fn output_keys_are_unique(
        raw in prop::collection::vec((0u8..3, 0u8..3, 1u32..5, 1u32..28), 0..40)
    ) {
        let names = ["A", "B", "C"];
        let tickers = ["AAPL", "MSFT", "NVDA"];
        let records: Vec<_> = raw
            .iter()
            .map(|&(n, t, day, disc)| record(names[n as usize], tickers[t as usize], day, disc))
            .collect();
        let out = dedupe_trades(records);
        let mut keys: Vec<_> = out.iter().map(TradeRecord::key).collect();
        let before = keys.len();
        keys.sort_by(|a, b| format!("{a:?}").cmp(&format!("{b:?}")));
        keys.dedup();
        prop_assert_eq!(before, keys.len());
    }

    #[test]
    fn kept_record_has_latest_disclosure(
        raw in prop::collection::vec((0u8..2, 1u32..4, 1u32..28), 1..40)
    ) {
        let names = ["A", "B"];
        let records: Vec<_> = raw
            .iter()
            .map(|&(n, day, disc)| record(names[n as usize], "AAPL", day, disc))
            .collect();
        let out = dedupe_trades(records.clone());
        for kept in &out {
            let max = records
                .iter()
                .filter(|r| r.key() == kept.key())
                .map(|r| r.disclosure_date)
                .max()
                .unwrap();
            prop_assert_eq!(kept.disclosure_date, max);
        }
    }
}
