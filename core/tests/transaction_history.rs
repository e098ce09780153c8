//! Transaction history queries and status lookups.

use bank_core::{
    clock::ManualClock, models::StatusLabel, BankStore, ErrorKind, Money, TransactionKind,
    TransactionQuery,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use std::sync::Arc;

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Store on a manual clock starting 2024-03-01 09:00 UTC, plus one funded
/// account.
fn setup() -> (BankStore, Arc<ManualClock>, i64) {
    let _ = env_logger::builder().is_test(true).try_init();
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    ));
    let store = BankStore::in_memory().unwrap().with_clock(clock.clone());
    let customer_id = store
        .create_customer("Ada Lovelace", "ada@example.com", "5550100100")
        .unwrap();
    let account_id = store
        .create_account(customer_id, "1000000001", money("1000.00"))
        .unwrap();
    (store, clock, account_id)
}

fn credit(store: &BankStore, account_id: i64, description: &str) -> i64 {
    store
        .create_transaction(account_id, TransactionKind::Credit, money("1.00"), description)
        .unwrap()
}

#[test]
fn undated_query_returns_newest_hundred() {
    let (store, clock, account_id) = setup();
    let mut ids = Vec::new();
    for i in 0..120 {
        ids.push(credit(&store, account_id, &format!("entry {i}")));
        clock.advance(Duration::minutes(1));
    }

    let rows = store
        .get_transactions(account_id, &TransactionQuery::recent())
        .unwrap();
    assert_eq!(rows.len(), 100);
    assert_eq!(rows.len() as u32, store.recent_transactions_limit());

    let returned: Vec<i64> = rows.iter().map(|t| t.transaction_id).collect();
    let expected: Vec<i64> = ids.iter().rev().take(100).copied().collect();
    assert_eq!(returned, expected, "rows must be the newest 100, newest first");
    assert!(rows
        .windows(2)
        .all(|w| w[0].created_at >= w[1].created_at));
}

#[test]
fn explicit_limit_overrides_default_cap() {
    let (store, clock, account_id) = setup();
    for _ in 0..10 {
        credit(&store, account_id, "x");
        clock.advance(Duration::seconds(1));
    }

    let rows = store
        .get_transactions(account_id, &TransactionQuery::recent().with_limit(3))
        .unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn same_instant_entries_order_by_id_descending() {
    let (store, _clock, account_id) = setup();
    let first = credit(&store, account_id, "first");
    let second = credit(&store, account_id, "second");

    let rows = store
        .get_transactions(account_id, &TransactionQuery::recent())
        .unwrap();
    let ids: Vec<i64> = rows.iter().map(|t| t.transaction_id).collect();
    assert_eq!(ids, vec![second, first]);
}

#[test]
fn date_range_is_inclusive_on_both_ends() {
    let (store, clock, account_id) = setup();

    clock.set(Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap());
    let before = credit(&store, account_id, "before");
    clock.set(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap());
    let start_edge = credit(&store, account_id, "start edge");
    clock.set(Utc.with_ymd_and_hms(2024, 3, 3, 23, 59, 59).unwrap());
    let end_edge = credit(&store, account_id, "end edge");
    clock.set(Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap());
    let after = credit(&store, account_id, "after");

    let rows = store
        .get_transactions(
            account_id,
            &TransactionQuery::between(date(2024, 3, 2), date(2024, 3, 3)),
        )
        .unwrap();
    let ids: Vec<i64> = rows.iter().map(|t| t.transaction_id).collect();
    assert_eq!(ids, vec![end_edge, start_edge]);
    assert!(!ids.contains(&before) && !ids.contains(&after));
}

#[test]
fn dated_query_is_not_capped() {
    let (store, clock, account_id) = setup();
    for _ in 0..130 {
        credit(&store, account_id, "bulk");
        clock.advance(Duration::seconds(30));
    }

    let rows = store
        .get_transactions(
            account_id,
            &TransactionQuery::between(date(2024, 3, 1), date(2024, 3, 1)),
        )
        .unwrap();
    assert_eq!(rows.len(), 130);
}

#[test]
fn lone_bound_is_ignored_and_default_cap_applies() {
    let (store, clock, account_id) = setup();
    let mut ids = Vec::new();
    for _ in 0..150 {
        ids.push(credit(&store, account_id, "bulk"));
        clock.advance(Duration::minutes(1));
    }
    let newest: Vec<i64> = ids.iter().rev().take(100).copied().collect();

    let only_start = TransactionQuery {
        start_date: Some(date(2000, 1, 1)),
        ..TransactionQuery::default()
    };
    assert!(!only_start.is_dated());
    let rows = store.get_transactions(account_id, &only_start).unwrap();
    let returned: Vec<i64> = rows.iter().map(|t| t.transaction_id).collect();
    assert_eq!(returned, newest);

    // Applied on its own, this end date would exclude every row.
    let only_end = TransactionQuery {
        end_date: Some(date(2000, 1, 1)),
        ..TransactionQuery::default()
    };
    let rows = store.get_transactions(account_id, &only_end).unwrap();
    assert_eq!(rows.len(), 100);
}

#[test]
fn inverted_range_is_rejected() {
    let (store, _clock, account_id) = setup();
    let err = store
        .get_transactions(
            account_id,
            &TransactionQuery::between(date(2024, 3, 5), date(2024, 3, 1)),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
}

#[test]
fn timestamps_come_from_store_clock() {
    let (store, clock, account_id) = setup();
    let at = Utc.with_ymd_and_hms(2023, 12, 31, 18, 30, 0).unwrap();
    clock.set(at);
    let id = credit(&store, account_id, "new year's eve");

    let txn = store.get_transaction(id).unwrap().unwrap();
    assert_eq!(txn.created_at, at);
}

#[test]
fn status_of_existing_transaction_is_completed() {
    let (store, _clock, account_id) = setup();
    let id = credit(&store, account_id, "probe");

    let status = store.get_transaction_status(id).unwrap();
    assert_eq!(status.status, StatusLabel::Completed);
    let txn = status.transaction.expect("transaction attached");
    assert_eq!(txn.transaction_id, id);
    assert_eq!(txn.description, "probe");

    let json = serde_json::to_value(store.get_transaction_status(id).unwrap()).unwrap();
    assert_eq!(json["status"], "completed");
    assert_eq!(json["transaction"]["transaction_type"], "credit");
    assert_eq!(json["transaction"]["amount"], "1.00");
}

#[test]
fn status_of_missing_transaction_is_not_found() {
    let (store, _clock, _account_id) = setup();

    let status = store.get_transaction_status(31_337).unwrap();
    assert_eq!(status.status, StatusLabel::NotFound);
    assert!(status.transaction.is_none());

    let json = serde_json::to_value(status).unwrap();
    assert_eq!(json["status"], "not found");
    assert!(json["transaction"].is_null());
}
