mod common;

use std::sync::{Arc, Mutex};

use pocket_ledger::{
    config::Config,
    core::Clock,
    storage::{KeyValueStore, MemoryStore},
    LedgerError, MoneySource, Session,
};

use common::{clock_at, file_store, utc};

#[test]
fn login_hydrates_what_the_previous_session_saved() {
    let store = file_store();
    let config = Config::default();

    let first = Session::login("meera", store.clone(), &config).unwrap();
    first.record_credit(750.0, "Salary", MoneySource::Bank).unwrap();
    first.record_debit(50.0, "Transport", MoneySource::Bank).unwrap();
    drop(first);

    let second = Session::login("meera", store, &config).unwrap();
    assert_eq!(second.user(), "meera");
    let aggregates = second.aggregates().unwrap();
    assert_eq!(aggregates.balance.bank, 700.0);
    assert_eq!(aggregates.spend.bank, 50.0);
}

#[test]
fn logout_removes_the_persisted_ledger() {
    let store = file_store();
    let config = Config::default();
    let session = Session::login("ravi", store.clone(), &config).unwrap();
    session.record_credit(20.0, "Gift", MoneySource::Cash).unwrap();
    assert!(store.get(&config.storage_key).unwrap().is_some());

    session.logout().unwrap();
    assert_eq!(store.get(&config.storage_key).unwrap(), None);

    let next = Session::login("ravi", store, &config).unwrap();
    assert_eq!(next.aggregates().unwrap().balance.total(), 0.0);
}

#[test]
fn observers_see_every_mutation_through_the_session() {
    let clock: Arc<dyn Clock> = clock_at(utc(2024, 3, 10, 9));
    let session = Session::login_with_clock(
        "anu",
        Arc::new(MemoryStore::new()),
        &Config::default(),
        Some(clock),
    )
    .unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    session
        .with_engine(|engine| {
            engine.subscribe(move |aggregates| {
                sink.lock().unwrap().push(aggregates.balance.cash);
            })
        })
        .unwrap();

    session.record_credit(100.0, "ATM", MoneySource::Cash).unwrap();
    session.record_debit(30.0, "Food", MoneySource::Cash).unwrap();
    let _ = session.record_debit(500.0, "Rent", MoneySource::Cash);
    session.with_engine(|engine| engine.clear()).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![100.0, 70.0, 0.0]);
}

#[test]
fn session_rejects_an_invalid_config() {
    let config = Config {
        storage_key: "   ".into(),
        ..Config::default()
    };
    let err = Session::login("sam", Arc::new(MemoryStore::new()), &config)
        .err()
        .expect("blank storage key must fail");
    assert!(matches!(err, LedgerError::Config(_)));
}

#[test]
fn custom_currency_symbol_flows_into_generated_notes() {
    let config = Config {
        currency_symbol: "$".into(),
        ..Config::default()
    };
    let session = Session::login("lee", Arc::new(MemoryStore::new()), &config).unwrap();
    let txn = session.record_credit(12.5, "Refund", MoneySource::Bank).unwrap();
    assert_eq!(txn.note(), Some("Added $12.5 to bank"));
}
