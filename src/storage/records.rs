//! Encoding of the transaction list and budget under their storage keys.
//!
//! Loads never fail: a missing key, unreadable store, or undecodable document
//! degrades to an empty list or an absent budget.
//!
//! Each stored transaction is decoded on its own. A record is dropped, with a
//! `warn!` naming its position, when it does not decode (an `id` that is not a
//! UUID, an unknown currency or type, a missing field) or when it decodes but
//! breaks an entry rule (negative or non-finite amount, blank description or
//! category). The rest of the list still loads.

use serde_json::Value;
use tracing::warn;

use crate::errors::Result;
use crate::ledger::{Budget, Transaction};

use super::KeyValueStore;

pub const TRANSACTIONS_KEY: &str = "expense-tracker-transactions";
pub const BUDGET_KEY: &str = "expense-tracker-budget";

/// Reads the stored transaction list, dropping individual records that fail to decode.
pub fn load_transactions(store: &dyn KeyValueStore) -> Vec<Transaction> {
    let Some(raw) = read_key(store, TRANSACTIONS_KEY) else {
        return Vec::new();
    };
    let documents: Vec<Value> = match serde_json::from_str(&raw) {
        Ok(documents) => documents,
        Err(err) => {
            warn!(key = TRANSACTIONS_KEY, error = %err, "stored transactions unreadable; starting empty");
            return Vec::new();
        }
    };

    let mut transactions = Vec::with_capacity(documents.len());
    for (index, document) in documents.into_iter().enumerate() {
        match serde_json::from_value::<Transaction>(document) {
            Ok(txn) if txn.is_well_formed() => transactions.push(txn),
            Ok(txn) => warn!(index, id = %txn.id(), "dropping stored transaction that breaks entry rules"),
            Err(err) => warn!(index, error = %err, "dropping undecodable stored transaction"),
        }
    }
    transactions
}

pub fn save_transactions(store: &dyn KeyValueStore, transactions: &[Transaction]) -> Result<()> {
    let json = serde_json::to_string(transactions)?;
    store.set(TRANSACTIONS_KEY, &json)
}

/// Reads the stored budget. Non-positive stored amounts load as absent.
pub fn load_budget(store: &dyn KeyValueStore) -> Option<Budget> {
    let raw = read_key(store, BUDGET_KEY)?;
    let stored: Budget = match serde_json::from_str(&raw) {
        Ok(budget) => budget,
        Err(err) => {
            warn!(key = BUDGET_KEY, error = %err, "stored budget unreadable; treating as unset");
            return None;
        }
    };
    match stored.revalidate() {
        Ok(budget) => Some(budget),
        Err(err) => {
            warn!(key = BUDGET_KEY, error = %err, "stored budget rejected; treating as unset");
            None
        }
    }
}

pub fn save_budget(store: &dyn KeyValueStore, budget: &Budget) -> Result<()> {
    let json = serde_json::to_string(budget)?;
    store.set(BUDGET_KEY, &json)
}

fn read_key(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, error = %err, "storage read failed; treating record as absent");
            None
        }
    }
}
