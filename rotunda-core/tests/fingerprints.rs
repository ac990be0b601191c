use chrono::NaiveDate;
use rotunda_core::Fingerprint;
use rotunda_types::{ChainQuery, DataCategory, TradeQuery};

#[test]
fn equivalent_queries_share_a_fingerprint() {
    let a = TradeQuery {
        tickers: vec!["aapl".into(), "MSFT".into()],
        ..TradeQuery::unfiltered()
    };
    let b = TradeQuery {
        tickers: vec!["msft".into(), "AAPL".into(), "aapl".into()],
        ..TradeQuery::unfiltered()
    };
    assert_eq!(Fingerprint::trades(&a), Fingerprint::trades(&b));
}

#[test]
fn category_is_encoded_in_the_key() {
    let trades = Fingerprint::trades(&TradeQuery::unfiltered());
    let chain = Fingerprint::chain(&ChainQuery::for_underlying("AAPL"));
    assert_ne!(trades, chain);
    assert_eq!(trades.category(), DataCategory::Trades);
    assert_eq!(chain.category(), DataCategory::OptionChain);
}

#[test]
fn fully_past_ranges_are_historical() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let past = TradeQuery {
        since: NaiveDate::from_ymd_opt(2024, 1, 1),
        until: NaiveDate::from_ymd_opt(2024, 12, 31),
        ..TradeQuery::unfiltered()
    };
    assert!(Fingerprint::trades(&past).is_historical(today));

    let open_ended = TradeQuery {
        since: NaiveDate::from_ymd_opt(2024, 1, 1),
        until: None,
        ..TradeQuery::unfiltered()
    };
    assert!(!Fingerprint::trades(&open_ended).is_historical(today));

    // Live chain snapshots never qualify.
    let chain = Fingerprint::chain(&ChainQuery::for_underlying("AAPL"));
    assert!(!chain.is_historical(today));
}
