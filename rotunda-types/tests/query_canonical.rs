use chrono::NaiveDate;
use rotunda_types::{TradeQuery, TransactionType};

#[test]
fn canonical_form_sorts_folds_and_dedups() {
    let q = TradeQuery {
        tickers: vec!["msft".into(), "AAPL".into(), "MSFT".into()],
        politicians: vec!["Nancy Pelosi".into(), "nancy pelosi".into()],
        transaction: Some(TransactionType::Buy),
        since: None,
        until: None,
    };
    let canon = q.canonicalized();
    assert_eq!(canon.tickers, vec!["AAPL".to_string(), "MSFT".to_string()]);
    assert_eq!(canon.politicians, vec!["nancy pelosi".to_string()]);
    assert_eq!(canon.transaction, Some(TransactionType::Buy));
}

#[test]
fn equivalent_queries_canonicalize_identically() {
    let a = TradeQuery {
        tickers: vec!["nvda".into(), "AMD".into()],
        ..TradeQuery::unfiltered()
    };
    let b = TradeQuery {
        tickers: vec!["amd".into(), "NVDA".into(), "nvda".into()],
        ..TradeQuery::unfiltered()
    };
    assert_eq!(a.canonicalized(), b.canonicalized());
}

#[test]
fn date_range_is_inclusive_on_both_ends() {
    let q = TradeQuery {
        since: NaiveDate::from_ymd_opt(2025, 1, 10),
        until: NaiveDate::from_ymd_opt(2025, 1, 20),
        ..TradeQuery::unfiltered()
    };
    let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
    assert!(q.contains_date(day(10)));
    assert!(q.contains_date(day(20)));
    assert!(!q.contains_date(day(9)));
    assert!(!q.contains_date(day(21)));
}
