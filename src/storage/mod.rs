//! Key-value persistence seam and the two record codecs stored through it.

pub mod json_backend;
pub mod memory;
pub mod records;

use crate::errors::Result;

/// Abstraction over string-valued key-value stores holding serialized records.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<()>;
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
pub use records::{BUDGET_KEY, TRANSACTIONS_KEY};
