#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use pocket_ledger::{
    config::Config,
    core::{Clock, FixedClock},
    storage::{JsonFileStore, KeyValueStore},
    LedgerEngine,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// File store rooted in a fresh temporary directory.
pub fn file_store() -> Arc<JsonFileStore> {
    let root = temp_dir().join("store");
    Arc::new(JsonFileStore::new(Some(root)).expect("create json store"))
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn clock_at(at: DateTime<Utc>) -> Arc<FixedClock> {
    Arc::new(FixedClock::new(at))
}

/// Hydrated engine over `store` whose clock is `clock`.
pub fn engine_with(store: Arc<dyn KeyValueStore>, clock: Arc<FixedClock>) -> LedgerEngine {
    let clock: Arc<dyn Clock> = clock;
    LedgerEngine::open(store, &Config::default()).with_clock(clock)
}
