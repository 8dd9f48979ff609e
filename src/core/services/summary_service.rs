//! Totals and per-category expense breakdown in a chosen display currency.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::currency::{Currency, RateTable};
use crate::ledger::{Transaction, TransactionKind};

/// Summed expense for one category label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    /// Fraction of total expense, in `[0, 1]`.
    pub share: f64,
}

/// Income, expense, and balance converted into `currency`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub currency: Currency,
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    /// Expense categories ordered by amount, largest first.
    pub category_breakdown: Vec<CategoryTotal>,
}

impl Summary {
    pub fn empty(currency: Currency) -> Self {
        Self {
            currency,
            total_income: 0.0,
            total_expense: 0.0,
            balance: 0.0,
            category_breakdown: Vec::new(),
        }
    }

    pub fn has_expenses(&self) -> bool {
        !self.category_breakdown.is_empty()
    }

    pub fn category(&self, label: &str) -> Option<&CategoryTotal> {
        self.category_breakdown
            .iter()
            .find(|entry| entry.category == label)
    }
}

/// Stateless aggregation over transaction slices. Every call is a full rescan.
pub struct SummaryService;

impl SummaryService {
    /// Aggregates with the built-in rate table.
    pub fn aggregate(transactions: &[Transaction], currency: Currency) -> Summary {
        Self::aggregate_with(RateTable::standard(), transactions, currency)
    }

    pub fn aggregate_with(
        rates: &RateTable,
        transactions: &[Transaction],
        currency: Currency,
    ) -> Summary {
        let mut totals = Accumulator::default();
        let mut categories = CategoryAccumulator::default();

        for txn in transactions {
            let converted = rates.convert(txn.amount(), txn.currency(), currency);
            match txn.kind() {
                TransactionKind::Income => totals.income += converted,
                TransactionKind::Expense => {
                    totals.expense += converted;
                    categories.add(txn.category(), converted);
                }
            }
        }

        debug!(
            transactions = transactions.len(),
            currency = currency.code(),
            income = totals.income,
            expense = totals.expense,
            "aggregated transactions"
        );

        Summary {
            currency,
            total_income: totals.income,
            total_expense: totals.expense,
            balance: totals.income - totals.expense,
            category_breakdown: categories.into_breakdown(totals.expense),
        }
    }
}

#[derive(Default)]
struct Accumulator {
    income: f64,
    expense: f64,
}

/// Sums per label while remembering first-seen order for stable tie-breaking.
#[derive(Default)]
struct CategoryAccumulator {
    order: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl CategoryAccumulator {
    fn add(&mut self, category: &str, amount: f64) {
        match self.index.get(category) {
            Some(&slot) => self.order[slot].1 += amount,
            None => {
                self.index.insert(category.to_string(), self.order.len());
                self.order.push((category.to_string(), amount));
            }
        }
    }

    fn into_breakdown(self, total_expense: f64) -> Vec<CategoryTotal> {
        let mut breakdown: Vec<CategoryTotal> = self
            .order
            .into_iter()
            .map(|(category, amount)| CategoryTotal {
                share: if total_expense > 0.0 {
                    amount / total_expense
                } else {
                    0.0
                },
                category,
                amount,
            })
            .collect();
        // `sort_by` is stable, so equal amounts keep first-seen order.
        breakdown.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        breakdown
    }
}
