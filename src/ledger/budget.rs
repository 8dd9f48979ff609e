use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::errors::TrackerError;

/// The single active spending limit, denominated in its own currency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    amount: f64,
    currency: Currency,
}

impl Budget {
    /// Rejects amounts that are not strictly positive and finite.
    pub fn new(amount: f64, currency: Currency) -> Result<Self, TrackerError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(TrackerError::InvalidBudget(amount));
        }
        Ok(Self { amount, currency })
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Re-runs construction checks, for values that arrived through deserialization.
    pub fn revalidate(self) -> Result<Self, TrackerError> {
        Self::new(self.amount, self.currency)
    }
}
