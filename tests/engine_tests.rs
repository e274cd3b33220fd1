mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Duration;
use pocket_ledger::{
    domain::Identifiable, storage::MemoryStore, LedgerError, MoneySource, TransactionKind,
};
use regex::Regex;

use common::{clock_at, engine_with, file_store, utc};

#[test]
fn salary_groceries_then_rent_is_rejected() {
    let mut engine = engine_with(Arc::new(MemoryStore::new()), clock_at(utc(2024, 3, 10, 9)));

    engine.record_credit(1000.0, "Salary", MoneySource::Bank).unwrap();
    engine.record_debit(200.0, "Groceries", MoneySource::Bank).unwrap();

    let aggregates = engine.aggregates().clone();
    assert_eq!(aggregates.balance.bank, 800.0);
    assert_eq!(aggregates.spend.bank, 200.0);
    assert_eq!(
        aggregates.category_totals,
        BTreeMap::from([("Groceries".to_string(), 200.0)])
    );

    let err = engine
        .record_debit(900.0, "Rent", MoneySource::Bank)
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(engine.balance(MoneySource::Bank), 800.0);
}

#[test]
fn balances_equal_credits_minus_debits_per_source() {
    let mut engine = engine_with(Arc::new(MemoryStore::new()), clock_at(utc(2024, 3, 10, 9)));
    let steps = [
        (TransactionKind::Credit, 120.5),
        (TransactionKind::Debit, 20.25),
        (TransactionKind::Credit, 7.75),
        (TransactionKind::Debit, 100.0),
        (TransactionKind::Debit, 8.0),
    ];
    let mut expected = 0.0;
    for (kind, amount) in steps {
        let recorded = match kind {
            TransactionKind::Credit => engine.record_credit(amount, "Pocket", MoneySource::Cash),
            TransactionKind::Debit => engine.record_debit(amount, "Snacks", MoneySource::Cash),
        };
        recorded.unwrap();
        expected += kind.sign() * amount;
    }

    assert!((engine.balance(MoneySource::Cash) - expected).abs() < 1e-9);
    assert_eq!(engine.balance(MoneySource::Bank), 0.0);
}

#[test]
fn overdraft_leaves_transactions_untouched() {
    let mut engine = engine_with(Arc::new(MemoryStore::new()), clock_at(utc(2024, 3, 10, 9)));
    engine.record_credit(50.0, "Gift", MoneySource::Cash).unwrap();
    engine.record_credit(500.0, "Salary", MoneySource::Bank).unwrap();
    let before = engine.transactions().to_vec();

    // Bank money does not cover a cash debit.
    let err = engine
        .record_debit(60.0, "Taxi", MoneySource::Cash)
        .unwrap_err();
    match err {
        LedgerError::InsufficientFunds {
            pool,
            requested,
            available,
        } => {
            assert_eq!(pool, MoneySource::Cash);
            assert_eq!(requested, 60.0);
            assert_eq!(available, 50.0);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(engine.transactions(), before.as_slice());
}

#[test]
fn invalid_amounts_and_categories_are_rejected() {
    let mut engine = engine_with(Arc::new(MemoryStore::new()), clock_at(utc(2024, 3, 10, 9)));

    for (amount, category) in [(0.0, "Food"), (10.0, ""), (-5.0, "Food"), (f64::NAN, "Food")] {
        let err = engine
            .record_credit(amount, category, MoneySource::Bank)
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)), "{amount} {category:?}");
    }
    assert!(engine.transactions().is_empty());
}

#[test]
fn persisted_ledger_reloads_identically() {
    let store = file_store();
    let clock = clock_at(utc(2024, 2, 27, 8));
    let mut engine = engine_with(store.clone(), Arc::clone(&clock));

    engine.record_credit(2500.0, "Salary", MoneySource::Bank).unwrap();
    clock.advance(Duration::minutes(90));
    engine.record_credit(300.0, "ATM", MoneySource::Cash).unwrap();
    clock.advance(Duration::hours(26));
    engine
        .record_debit_with_note(42.5, "Food", MoneySource::Cash, Some("lunch with team"))
        .unwrap();
    engine.record_debit(999.99, "Bills", MoneySource::Bank).unwrap();

    let reloaded = engine_with(store, clock_at(utc(2024, 3, 1, 0)));
    assert_eq!(reloaded.transactions().len(), 4);
    assert_eq!(reloaded.transactions(), engine.transactions());
    assert_eq!(reloaded.aggregates(), engine.aggregates());
}

#[test]
fn newest_transaction_comes_first_with_generated_fields() {
    let mut engine = engine_with(Arc::new(MemoryStore::new()), clock_at(utc(2024, 3, 10, 9)));
    engine.record_credit(1000.0, "Salary", MoneySource::Bank).unwrap();
    engine.record_debit(300.0, "Shopping", MoneySource::Bank).unwrap();

    let uuid = Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .unwrap();
    let note = Regex::new(r"^(Added ₹\d+(\.\d+)? to|Spent ₹\d+(\.\d+)? from) (bank|cash)$").unwrap();

    let [latest, first] = engine.transactions() else {
        panic!("expected two transactions");
    };
    assert_eq!(latest.kind(), TransactionKind::Debit);
    assert_eq!(first.kind(), TransactionKind::Credit);
    assert_eq!(first.note(), Some("Added ₹1000 to bank"));
    assert_eq!(latest.note(), Some("Spent ₹300 from bank"));
    for txn in engine.transactions() {
        assert!(uuid.is_match(txn.id()), "id {}", txn.id());
        assert!(note.is_match(txn.note().unwrap_or_default()));
        assert_eq!(txn.timestamp(), utc(2024, 3, 10, 9));
    }
    assert_ne!(latest.id(), first.id());
}

#[test]
fn clear_twice_is_harmless() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = engine_with(store.clone(), clock_at(utc(2024, 3, 10, 9)));
    engine.record_credit(10.0, "Gift", MoneySource::Cash).unwrap();

    engine.clear();
    assert!(engine.transactions().is_empty());
    engine.clear();
    assert!(engine.transactions().is_empty());
    assert!(store.is_empty());
    assert!(!engine.is_dirty());
}

#[test]
fn category_totals_ignore_credits() {
    let mut engine = engine_with(Arc::new(MemoryStore::new()), clock_at(utc(2024, 3, 10, 9)));
    engine.record_credit(200.0, "Float", MoneySource::Cash).unwrap();
    engine.record_credit(100.0, "Salary", MoneySource::Bank).unwrap();
    engine.record_debit(50.0, "Food", MoneySource::Bank).unwrap();
    engine.record_debit(30.0, "Food", MoneySource::Cash).unwrap();

    let totals = &engine.aggregates().category_totals;
    assert_eq!(totals.len(), 1);
    assert_eq!(totals.get("Food"), Some(&80.0));
}

#[test]
fn weekly_bucket_places_monday_first_and_sunday_last() {
    // 2024-03-11 is a Monday, 2024-03-17 the following Sunday.
    let clock = clock_at(utc(2024, 3, 11, 10));
    let mut engine = engine_with(Arc::new(MemoryStore::new()), Arc::clone(&clock));
    engine.record_credit(500.0, "Salary", MoneySource::Bank).unwrap();
    engine.record_debit(40.0, "Transport", MoneySource::Bank).unwrap();
    clock.set(utc(2024, 3, 17, 18));
    engine.record_debit(25.0, "Food", MoneySource::Bank).unwrap();

    let series = engine.current_week();
    assert_eq!(series[0], 40.0);
    assert_eq!(series[6], 25.0);
    assert_eq!(series.iter().sum::<f64>(), 65.0);

    // A week later both days have left the window.
    let later = engine.weekly_bucket(utc(2024, 3, 24, 12));
    assert_eq!(later, [0.0; 7]);
}

#[test]
fn monthly_bucket_sums_spend_by_month_label() {
    let clock = clock_at(utc(2024, 1, 15, 12));
    let mut engine = engine_with(Arc::new(MemoryStore::new()), Arc::clone(&clock));
    engine.record_credit(5000.0, "Salary", MoneySource::Bank).unwrap();
    engine.record_debit(100.0, "Bills", MoneySource::Bank).unwrap();
    clock.set(utc(2024, 2, 3, 12));
    engine.record_debit(40.0, "Food", MoneySource::Bank).unwrap();
    engine.record_debit(60.0, "Food", MoneySource::Bank).unwrap();

    let labels: Vec<_> = engine
        .monthly_totals()
        .into_iter()
        .map(|total| (total.label, total.amount))
        .collect();
    assert_eq!(labels, vec![("Jan".to_string(), 100.0), ("Feb".to_string(), 100.0)]);
    assert_eq!(engine.monthly_bucket(&["Feb", "Mar", "Jan"]), vec![100.0, 0.0, 100.0]);
}
