#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use finance_tracker::core::{Clock, IdSource};
use finance_tracker::errors::{Result, TrackerError};
use finance_tracker::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use finance_tracker::{Currency, RateTable, Tracker, TransactionDraft, TransactionKind};
use tempfile::TempDir;
use uuid::Uuid;

/// Clock that starts at a fixed instant and advances one second per reading.
pub struct FixedClock {
    start: DateTime<Utc>,
    ticks: AtomicU64,
}

impl FixedClock {
    pub fn new() -> Self {
        Self {
            start: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
            ticks: AtomicU64::new(0),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + chrono::Duration::seconds(tick as i64)
    }
}

/// Deterministic ids: 1, 2, 3, ...
#[derive(Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> Uuid {
        Uuid::from_u128(u128::from(self.next.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

/// Store whose writes always fail; reads report nothing stored.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<()> {
        Err(TrackerError::Persistence(format!("disk full writing {key}")))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(TrackerError::Persistence("disk full".into()))
    }
}

/// Store whose reads always fail; writes are accepted and discarded.
pub struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Err(TrackerError::Persistence(format!("permission denied reading {key}")))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

/// Forwards to a shared inner store so a test can inspect what the tracker wrote.
pub struct SharedStore(pub Arc<MemoryStore>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.0.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.0.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.0.remove(key)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn expense(amount: f64, currency: Currency, category: &str) -> TransactionDraft {
    TransactionDraft::new(
        TransactionKind::Expense,
        amount,
        currency,
        format!("{category} purchase"),
        category,
        date(2025, 3, 1),
    )
}

pub fn income(amount: f64, currency: Currency, category: &str) -> TransactionDraft {
    TransactionDraft::new(
        TransactionKind::Income,
        amount,
        currency,
        format!("{category} payment"),
        category,
        date(2025, 3, 1),
    )
}

/// Deterministic tracker over the given store.
pub fn tracker_with(store: Box<dyn KeyValueStore>) -> Tracker {
    Tracker::with_environment(
        store,
        RateTable::default(),
        Box::new(FixedClock::new()),
        Box::new(SequentialIds::default()),
    )
}

pub fn memory_tracker() -> Tracker {
    tracker_with(Box::new(MemoryStore::new()))
}

/// File-backed tracker in a fresh temp directory. Keep the guard alive for the test.
pub fn file_tracker() -> (Tracker, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let store = JsonFileStore::with_retention(temp.path(), 3).expect("create json store");
    (tracker_with(Box::new(store)), temp)
}
