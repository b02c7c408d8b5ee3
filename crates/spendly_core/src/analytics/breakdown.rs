//! Category and month-of-year breakdowns.

use crate::model::expense::Expense;
use crate::model::record::LedgerRecord;
use chrono::Datelike;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Expense total for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    /// Percent of the overall expense total; `0.0` when that total is zero.
    pub share_percent: f64,
    pub count: usize,
}

/// Sums expenses per category.
///
/// Sorted by total descending, ties broken by category name. Shares are 0
/// when the overall total is zero, including signed amounts that cancel out
/// to floating-point noise.
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for expense in expenses {
        let entry = sums.entry(expense.category.as_str()).or_insert((0.0, 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let overall: f64 = sums.values().map(|(sum, _)| sum).sum();
    let mut breakdown = sums
        .into_iter()
        .map(|(category, (sum, count))| CategoryTotal {
            category: category.to_string(),
            total: sum,
            share_percent: if overall.abs() < f64::EPSILON {
                0.0
            } else {
                sum / overall * 100.0
            },
            count,
        })
        .collect::<Vec<_>>();

    breakdown.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    breakdown
}

/// Expenses whose category equals `category`, in collection order.
pub fn category_expenses<'a>(expenses: &'a [Expense], category: &str) -> Vec<&'a Expense> {
    expenses
        .iter()
        .filter(|expense| expense.category == category)
        .collect()
}

pub fn category_total(expenses: &[Expense], category: &str) -> f64 {
    category_expenses(expenses, category)
        .into_iter()
        .map(|expense| expense.amount)
        .sum()
}

/// Sums amounts by month index (`0` = January) of `date`.
///
/// The year is ignored: January 2023 and January 2024 land in bucket `0`.
/// Months without records are absent from the map.
pub fn monthly_breakdown<R: LedgerRecord>(records: &[R]) -> BTreeMap<u32, f64> {
    let mut months = BTreeMap::new();
    for record in records {
        *months.entry(record.date().month0()).or_insert(0.0) += record.amount();
    }
    months
}
