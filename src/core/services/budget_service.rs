//! Evaluates total spending against the single monthly budget.

use serde::Serialize;
use tracing::debug;

use crate::currency::{format_currency_value, round_half_up, RateTable};
use crate::ledger::{Budget, Transaction};

/// Fraction of the budget at which spending is flagged as approaching the limit.
pub const NEAR_LIMIT_RATIO: f64 = 0.80;

/// Figures derived for a present budget. All amounts are in the budget's currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    pub budget: Budget,
    pub spent: f64,
    /// Unclamped; exceeds 100 once the budget is overrun.
    pub used_percentage: f64,
    /// Negative when the budget is overrun.
    pub remaining: f64,
}

impl BudgetUsage {
    fn measure(budget: Budget, spent: f64) -> Self {
        Self {
            budget,
            spent,
            used_percentage: spent / budget.amount() * 100.0,
            remaining: budget.amount() - spent,
        }
    }

    /// Percentage clamped to `[0, 100]` for progress bars.
    pub fn progress_percentage(&self) -> f64 {
        self.used_percentage.clamp(0.0, 100.0)
    }

    pub fn over_amount(&self) -> f64 {
        self.spent - self.budget.amount()
    }

    fn spent_line(&self, with_percentage: bool) -> String {
        let currency = self.budget.currency();
        let base = format!(
            "You've spent {} of your {} budget",
            format_currency_value(self.spent, currency),
            format_currency_value(self.budget.amount(), currency)
        );
        if with_percentage {
            format!("{} ({:.0}%)", base, round_half_up(self.used_percentage, 0))
        } else {
            base
        }
    }
}

/// Budget utilization state. Figures exist only when a budget is present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", content = "usage", rename_all = "camelCase")]
pub enum BudgetStatus {
    Unset,
    OnTrack(BudgetUsage),
    Near(BudgetUsage),
    Exceeded(BudgetUsage),
}

impl BudgetStatus {
    pub fn usage(&self) -> Option<&BudgetUsage> {
        match self {
            BudgetStatus::Unset => None,
            BudgetStatus::OnTrack(usage)
            | BudgetStatus::Near(usage)
            | BudgetStatus::Exceeded(usage) => Some(usage),
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            BudgetStatus::Unset => "Set a monthly budget to track your spending",
            BudgetStatus::OnTrack(_) => "Budget on Track",
            BudgetStatus::Near(_) => "Approaching Budget Limit",
            BudgetStatus::Exceeded(_) => "Budget Exceeded!",
        }
    }

    /// Body lines of the budget alert panel.
    pub fn details(&self) -> Vec<String> {
        match self {
            BudgetStatus::Unset => Vec::new(),
            BudgetStatus::OnTrack(usage) | BudgetStatus::Near(usage) => vec![
                usage.spent_line(true),
                format!(
                    "{} remaining",
                    format_currency_value(usage.remaining, usage.budget.currency())
                ),
            ],
            BudgetStatus::Exceeded(usage) => vec![
                usage.spent_line(false),
                format!(
                    "Over budget by {}",
                    format_currency_value(usage.over_amount(), usage.budget.currency())
                ),
            ],
        }
    }
}

/// Stateless budget evaluation over transaction slices.
pub struct BudgetService;

impl BudgetService {
    /// Evaluates with the built-in rate table.
    pub fn evaluate(transactions: &[Transaction], budget: Option<Budget>) -> BudgetStatus {
        Self::evaluate_with(RateTable::standard(), transactions, budget)
    }

    pub fn evaluate_with(
        rates: &RateTable,
        transactions: &[Transaction],
        budget: Option<Budget>,
    ) -> BudgetStatus {
        let Some(budget) = budget else {
            return BudgetStatus::Unset;
        };

        let spent = Self::spent_in(rates, transactions, budget);
        let usage = BudgetUsage::measure(budget, spent);
        let status = if spent > budget.amount() {
            BudgetStatus::Exceeded(usage)
        } else if spent / budget.amount() >= NEAR_LIMIT_RATIO {
            BudgetStatus::Near(usage)
        } else {
            BudgetStatus::OnTrack(usage)
        };

        debug!(
            spent,
            budget = budget.amount(),
            currency = %budget.currency(),
            status = status.headline(),
            "evaluated budget"
        );
        status
    }

    /// Sums every expense, converted into the budget's currency.
    pub fn spent_in(rates: &RateTable, transactions: &[Transaction], budget: Budget) -> f64 {
        transactions
            .iter()
            .filter(|txn| txn.is_expense())
            .map(|txn| rates.convert(txn.amount(), txn.currency(), budget.currency()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use crate::ledger::{TransactionDraft, TransactionKind};
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn expense(amount: f64, currency: Currency) -> Transaction {
        let draft = TransactionDraft::new(
            TransactionKind::Expense,
            amount,
            currency,
            "spend",
            "Food",
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        );
        Transaction::record(draft, Uuid::new_v4(), Utc::now()).unwrap()
    }

    fn budget(amount: f64) -> Budget {
        Budget::new(amount, Currency::Eur).unwrap()
    }

    #[test]
    fn absent_budget_is_unset() {
        let status = BudgetService::evaluate(&[expense(10.0, Currency::Eur)], None);
        assert_eq!(status, BudgetStatus::Unset);
        assert!(status.usage().is_none());
        assert!(status.details().is_empty());
    }

    #[test]
    fn threshold_boundaries() {
        let cases = [
            (79.99, "Budget on Track"),
            (80.0, "Approaching Budget Limit"),
            (100.0, "Approaching Budget Limit"),
            (100.01, "Budget Exceeded!"),
        ];
        for (spent, headline) in cases {
            let status = BudgetService::evaluate(&[expense(spent, Currency::Eur)], Some(budget(100.0)));
            assert_eq!(status.headline(), headline, "spent {spent}");
        }
    }

    #[test]
    fn spending_converts_into_budget_currency() {
        let inr_budget = Budget::new(9050.0, Currency::Inr).unwrap();
        let status = BudgetService::evaluate(&[expense(50.0, Currency::Eur)], Some(inr_budget));
        let usage = status.usage().copied().unwrap();
        assert_eq!(usage.spent, 4525.0);
        assert_eq!(usage.used_percentage, 50.0);
        assert!(matches!(status, BudgetStatus::OnTrack(_)));
    }

    #[test]
    fn income_does_not_count_as_spending() {
        let draft = TransactionDraft::new(
            TransactionKind::Income,
            500.0,
            Currency::Eur,
            "pay",
            "Salary",
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        );
        let income = Transaction::record(draft, Uuid::new_v4(), Utc::now()).unwrap();
        let status = BudgetService::evaluate(&[income], Some(budget(100.0)));
        let usage = status.usage().copied().unwrap();
        assert_eq!(usage.spent, 0.0);
        assert_eq!(usage.remaining, 100.0);
    }

    #[test]
    fn alert_lines_match_state() {
        let near = BudgetService::evaluate(&[expense(85.0, Currency::Eur)], Some(budget(100.0)));
        assert_eq!(
            near.details(),
            vec![
                "You've spent €85.00 of your €100.00 budget (85%)".to_string(),
                "€15.00 remaining".to_string(),
            ]
        );

        let half = BudgetService::evaluate(&[expense(169.0, Currency::Eur)], Some(budget(200.0)));
        assert_eq!(
            half.details()[0],
            "You've spent €169.00 of your €200.00 budget (85%)"
        );

        let over = BudgetService::evaluate(&[expense(120.0, Currency::Eur)], Some(budget(100.0)));
        assert_eq!(
            over.details(),
            vec![
                "You've spent €120.00 of your €100.00 budget".to_string(),
                "Over budget by €20.00".to_string(),
            ]
        );
        let usage = over.usage().copied().unwrap();
        assert_eq!(usage.progress_percentage(), 100.0);
        assert_eq!(usage.used_percentage, 120.0);
    }
}
