use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::Currency;
use crate::errors::TrackerError;

const INCOME_CATEGORIES: &[&str] = &["Salary", "Freelance", "Scholarship", "Part-time", "Other"];
const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Accommodation",
    "Books",
    "Entertainment",
    "Bills",
    "Other",
];

/// Direction of a transaction. Amounts are always non-negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Recommended category labels for the entry form. Any label is accepted.
    pub fn suggested_categories(self) -> &'static [&'static str] {
        match self {
            TransactionKind::Income => INCOME_CATEGORIES,
            TransactionKind::Expense => EXPENSE_CATEGORIES,
        }
    }
}

/// A recorded income or expense event.
///
/// Records are immutable once created; the only lifecycle step after creation is
/// removal by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: Uuid,
    #[serde(rename = "type")]
    kind: TransactionKind,
    amount: f64,
    currency: Currency,
    description: String,
    category: String,
    date: NaiveDate,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
}

impl Transaction {
    /// Validates `draft` and stamps it with the supplied id and creation time.
    pub fn record(
        draft: TransactionDraft,
        id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TrackerError> {
        draft.validate()?;
        Ok(Self {
            id,
            kind: draft.kind,
            amount: draft.amount,
            currency: draft.currency,
            description: draft.description.trim().to_string(),
            category: draft.category.trim().to_string(),
            date: draft.date,
            created_at,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Checks invariants that deserialization alone cannot enforce: the same rules
    /// [`TransactionDraft::validate`] applies on entry.
    pub fn is_well_formed(&self) -> bool {
        self.amount.is_finite()
            && self.amount >= 0.0
            && !self.description.trim().is_empty()
            && !self.category.trim().is_empty()
    }
}

/// Orders by date, newest first; ties fall back to creation time, newest first.
pub fn sort_recent_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.created_at.cmp(&a.created_at))
    });
}

/// A transaction submission before an id and timestamp are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub amount: f64,
    pub currency: Currency,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
}

impl TransactionDraft {
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        currency: Currency,
        description: impl Into<String>,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            amount,
            currency,
            description: description.into(),
            category: category.into(),
            date,
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        if !self.amount.is_finite() {
            return Err(TrackerError::MalformedInput(
                "amount must be a finite number".into(),
            ));
        }
        if self.amount < 0.0 {
            return Err(TrackerError::MalformedInput(
                "amount must not be negative".into(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(TrackerError::MalformedInput("description is required".into()));
        }
        if self.category.trim().is_empty() {
            return Err(TrackerError::MalformedInput("category is required".into()));
        }
        Ok(())
    }
}
