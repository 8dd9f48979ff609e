//! Ledger records: transactions and the monthly budget.

pub mod budget;
pub mod transaction;

pub use budget::Budget;
pub use transaction::{sort_recent_first, Transaction, TransactionDraft, TransactionKind};
