//! Balance and savings-rate summary.

use crate::model::expense::Expense;
use crate::model::income::Income;
use crate::model::record::LedgerRecord;
use serde::Serialize;

/// Sum of `amount` over a collection.
pub fn total<R: LedgerRecord>(records: &[R]) -> f64 {
    records.iter().map(R::amount).sum()
}

/// Total income minus total expenses.
pub fn balance(total_income: f64, total_expenses: f64) -> f64 {
    total_income - total_expenses
}

/// Share of income kept, in percent.
///
/// Exactly `0.0` when income is not positive.
pub fn savings_rate(total_income: f64, total_expenses: f64) -> f64 {
    if total_income > 0.0 {
        (total_income - total_expenses) / total_income * 100.0
    } else {
        0.0
    }
}

/// Savings rate clamped into `[0, 100]` for progress display.
pub fn savings_progress(rate: f64) -> f64 {
    rate.clamp(0.0, 100.0)
}

/// Figures shown on the summary card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    /// Percent, see `savings_rate`.
    pub savings_rate: f64,
}

impl FinancialSummary {
    pub fn from_records(incomes: &[Income], expenses: &[Expense]) -> Self {
        let total_income = total(incomes);
        let total_expenses = total(expenses);
        Self {
            total_income,
            total_expenses,
            balance: balance(total_income, total_expenses),
            savings_rate: savings_rate(total_income, total_expenses),
        }
    }

    pub fn savings_progress(&self) -> f64 {
        savings_progress(self.savings_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::{savings_progress, savings_rate, FinancialSummary};

    #[test]
    fn savings_rate_is_zero_without_income() {
        assert_eq!(savings_rate(0.0, 0.0), 0.0);
        assert_eq!(savings_rate(0.0, 500.0), 0.0);
        assert_eq!(savings_rate(-10.0, 5.0), 0.0);
    }

    #[test]
    fn savings_rate_can_be_negative_when_overspending() {
        assert_eq!(savings_rate(100.0, 25.0), 75.0);
        assert_eq!(savings_rate(100.0, 150.0), -50.0);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(savings_progress(-50.0), 0.0);
        assert_eq!(savings_progress(42.5), 42.5);
        assert_eq!(savings_progress(140.0), 100.0);
    }

    #[test]
    fn empty_collections_summarize_to_zero() {
        let summary = FinancialSummary::from_records(&[], &[]);
        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.total_expenses, 0.0);
        assert_eq!(summary.balance, 0.0);
        assert_eq!(summary.savings_rate, 0.0);
    }
}
