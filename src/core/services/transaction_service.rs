//! Business logic helpers for creating, removing, and listing transactions.

use uuid::Uuid;

use crate::core::clock::{Clock, IdSource};
use crate::errors::Result;
use crate::ledger::{sort_recent_first, Transaction, TransactionDraft};

/// Validated helpers over an owned transaction collection.
pub struct TransactionService;

impl TransactionService {
    /// Validates `draft`, stamps it with a fresh id and the current time, and appends it.
    ///
    /// A rejected draft leaves `transactions` untouched.
    pub fn add(
        transactions: &mut Vec<Transaction>,
        draft: TransactionDraft,
        ids: &dyn IdSource,
        clock: &dyn Clock,
    ) -> Result<Transaction> {
        let txn = Transaction::record(draft, ids.next_id(), clock.now())?;
        transactions.push(txn.clone());
        Ok(txn)
    }

    /// Removes every transaction carrying `id`, returning the first one removed.
    pub fn remove(transactions: &mut Vec<Transaction>, id: Uuid) -> Option<Transaction> {
        let mut removed = None;
        transactions.retain(|txn| {
            if txn.id() != id {
                return true;
            }
            if removed.is_none() {
                removed = Some(txn.clone());
            }
            false
        });
        removed
    }

    /// Returns a copy in listing order: newest date first, then newest creation.
    pub fn recent_first(transactions: &[Transaction]) -> Vec<Transaction> {
        let mut sorted = transactions.to_vec();
        sort_recent_first(&mut sorted);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::{RandomIds, SystemClock};
    use crate::currency::Currency;
    use crate::errors::TrackerError;
    use crate::ledger::TransactionKind;
    use chrono::{NaiveDate, Utc};

    fn sample_draft(description: &str) -> TransactionDraft {
        TransactionDraft::new(
            TransactionKind::Expense,
            42.0,
            Currency::Eur,
            description,
            "Books",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn add_rejects_blank_description_without_mutation() {
        let mut list = Vec::new();
        let err = TransactionService::add(&mut list, sample_draft("  "), &RandomIds, &SystemClock)
            .expect_err("blank description must be rejected");
        assert!(matches!(err, TrackerError::MalformedInput(_)));
        assert!(list.is_empty());
    }

    #[test]
    fn remove_returns_deleted_transaction() {
        let mut list = Vec::new();
        let txn =
            TransactionService::add(&mut list, sample_draft("Textbook"), &RandomIds, &SystemClock)
                .unwrap();

        let removed = TransactionService::remove(&mut list, txn.id()).unwrap();
        assert_eq!(removed, txn);
        assert!(list.is_empty());
    }

    #[test]
    fn remove_drops_every_copy_of_a_repeated_id() {
        let shared = Uuid::new_v4();
        let mut list: Vec<Transaction> = ["first", "second"]
            .into_iter()
            .map(|desc| Transaction::record(sample_draft(desc), shared, Utc::now()).unwrap())
            .collect();
        TransactionService::add(&mut list, sample_draft("Other"), &RandomIds, &SystemClock).unwrap();

        let removed = TransactionService::remove(&mut list, shared).unwrap();
        assert_eq!(removed.description(), "first");
        assert_eq!(list.len(), 1);
        assert!(list.iter().all(|txn| txn.id() != shared));
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut list = Vec::new();
        TransactionService::add(&mut list, sample_draft("Pens"), &RandomIds, &SystemClock).unwrap();
        let before = list.clone();

        assert!(TransactionService::remove(&mut list, Uuid::new_v4()).is_none());
        assert_eq!(list, before);
    }
}
