//! Record lifecycle manager: owns the transaction list and budget and writes them through to storage.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::TrackerConfig;
use crate::core::clock::{Clock, IdSource, RandomIds, SystemClock};
use crate::core::services::{
    BudgetService, BudgetStatus, Summary, SummaryService, TransactionService,
};
use crate::currency::{Conversion, Currency, RateTable};
use crate::errors::{Result, TrackerError};
use crate::ledger::{Budget, Transaction, TransactionDraft};
use crate::storage::{records, JsonFileStore, KeyValueStore};

/// Single-writer handle for hosts that share a tracker across threads.
pub type SharedTracker = Arc<Mutex<Tracker>>;

/// Facade that coordinates the in-memory records, derived views, and persistence.
///
/// In-memory state is authoritative for the session: a failed write is logged and
/// remembered in [`Tracker::write_failure`] but never rolls back the mutation.
pub struct Tracker {
    transactions: Vec<Transaction>,
    budget: Option<Budget>,
    rates: RateTable,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdSource>,
    write_failure: Option<TrackerError>,
}

impl Tracker {
    /// Loads persisted state from `store` using the system clock and random ids.
    pub fn open(store: Box<dyn KeyValueStore>, rates: RateTable) -> Self {
        Self::with_environment(store, rates, Box::new(SystemClock), Box::new(RandomIds))
    }

    pub fn with_environment(
        store: Box<dyn KeyValueStore>,
        rates: RateTable,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdSource>,
    ) -> Self {
        let transactions = records::load_transactions(store.as_ref());
        let budget = records::load_budget(store.as_ref());
        info!(
            transactions = transactions.len(),
            budget_set = budget.is_some(),
            "tracker opened"
        );
        Self {
            transactions,
            budget,
            rates,
            store,
            clock,
            ids,
            write_failure: None,
        }
    }

    /// Opens a file-backed tracker in the configured data directory.
    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        let rates = config.rate_table()?;
        let store = JsonFileStore::new(config.resolved_data_dir()?)?;
        Ok(Self::open(Box::new(store), rates))
    }

    pub fn into_shared(self) -> SharedTracker {
        Arc::new(Mutex::new(self))
    }

    /// Validates and records a new transaction, then persists the collection.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<Transaction> {
        let txn = TransactionService::add(
            &mut self.transactions,
            draft,
            self.ids.as_ref(),
            self.clock.as_ref(),
        )?;
        info!(
            id = %txn.id(),
            kind = txn.kind().label(),
            amount = txn.amount(),
            currency = %txn.currency(),
            "transaction added"
        );
        self.persist_transactions();
        Ok(txn)
    }

    /// Removes the transaction with `id` if present. Unknown ids are not an error.
    pub fn delete_transaction(&mut self, id: Uuid) -> Option<Transaction> {
        let removed = TransactionService::remove(&mut self.transactions, id);
        match &removed {
            Some(txn) => info!(id = %txn.id(), "transaction deleted"),
            None => info!(id = %id, "delete requested for unknown transaction"),
        }
        self.persist_transactions();
        removed
    }

    /// Replaces the budget. Non-positive amounts are rejected and the prior budget is kept.
    pub fn set_budget(&mut self, amount: f64, currency: Currency) -> Result<Budget> {
        let budget = Budget::new(amount, currency)?;
        self.budget = Some(budget);
        info!(amount, currency = %currency, "budget set");
        self.persist_budget(&budget);
        Ok(budget)
    }

    /// Records in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn recent_transactions(&self) -> Vec<Transaction> {
        TransactionService::recent_first(&self.transactions)
    }

    pub fn budget(&self) -> Option<Budget> {
        self.budget
    }

    pub fn summary(&self, currency: Currency) -> Summary {
        SummaryService::aggregate_with(&self.rates, &self.transactions, currency)
    }

    pub fn budget_status(&self) -> BudgetStatus {
        BudgetService::evaluate_with(&self.rates, &self.transactions, self.budget)
    }

    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        self.rates.convert(amount, from, to)
    }

    pub fn quote(&self, amount: f64, from: Currency, to: Currency) -> Conversion {
        self.rates.quote(amount, from, to)
    }

    /// Last write-through failure, cleared by the next successful write.
    pub fn write_failure(&self) -> Option<&TrackerError> {
        self.write_failure.as_ref()
    }

    fn persist_transactions(&mut self) {
        let outcome = records::save_transactions(self.store.as_ref(), &self.transactions);
        self.record_write("transactions", outcome);
    }

    fn persist_budget(&mut self, budget: &Budget) {
        let outcome = records::save_budget(self.store.as_ref(), budget);
        self.record_write("budget", outcome);
    }

    fn record_write(&mut self, record: &str, outcome: Result<()>) {
        match outcome {
            Ok(()) => self.write_failure = None,
            Err(err) => {
                warn!(record, error = %err, "write-through failed; keeping in-memory state");
                self.write_failure = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionKind;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn tracker() -> Tracker {
        Tracker::open(Box::new(MemoryStore::new()), RateTable::default())
    }

    fn draft(kind: TransactionKind, amount: f64, category: &str) -> TransactionDraft {
        TransactionDraft::new(
            kind,
            amount,
            Currency::Eur,
            "entry",
            category,
            NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
        )
    }

    #[test]
    fn mutations_feed_derived_views() {
        let mut tracker = tracker();
        tracker
            .add_transaction(draft(TransactionKind::Income, 100.0, "Salary"))
            .unwrap();
        let expense = tracker
            .add_transaction(draft(TransactionKind::Expense, 85.0, "Food"))
            .unwrap();
        tracker.set_budget(100.0, Currency::Eur).unwrap();

        assert_eq!(tracker.summary(Currency::Eur).balance, 15.0);
        assert!(matches!(tracker.budget_status(), BudgetStatus::Near(_)));

        tracker.delete_transaction(expense.id());
        assert!(matches!(tracker.budget_status(), BudgetStatus::OnTrack(_)));
        assert!(tracker.write_failure().is_none());
    }

    #[test]
    fn rejected_budget_keeps_previous() {
        let mut tracker = tracker();
        tracker.set_budget(50.0, Currency::Inr).unwrap();
        let err = tracker.set_budget(0.0, Currency::Eur).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidBudget(_)));
        assert_eq!(tracker.budget(), Some(Budget::new(50.0, Currency::Inr).unwrap()));
    }

    #[test]
    fn shared_handle_serializes_access() {
        let shared = tracker().into_shared();
        let worker = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                let mut guard = shared.lock().unwrap();
                guard
                    .add_transaction(draft(TransactionKind::Expense, 5.0, "Books"))
                    .unwrap();
            })
        };
        worker.join().unwrap();
        assert_eq!(shared.lock().unwrap().transactions().len(), 1);
    }
}
