#![doc(test(attr(deny(warnings))))]

//! Finance Tracker offers the two-currency conversion, aggregation, and budget
//! evaluation core behind a personal expense tracker, plus the record lifecycle
//! manager that persists transactions and the monthly budget.

pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::services::{BudgetStatus, BudgetUsage, CategoryTotal, Summary};
pub use crate::core::{SharedTracker, Tracker};
pub use currency::{convert, Currency, RateTable};
pub use errors::{Result, TrackerError};
pub use ledger::{Budget, Transaction, TransactionDraft, TransactionKind};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Tracker tracing initialized.");
    });
}
