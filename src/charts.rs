//! Raw data series for the dashboard charts.
//!
//! Unlike the report text these series are not truncated, so a chart can show
//! every category and every day of the month.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use time::Date;

use crate::{
    models::{Budget, Transaction, TransactionType},
    period::Period,
};

/// Total expenses on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyExpense {
    /// The day.
    pub date: Date,
    /// Sum of expenses on `date`.
    pub amount: f64,
}

/// The series behind the category, trend and budget-vs-actual charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    /// Expense per category, ordered by category name.
    pub expense_by_category: BTreeMap<String, f64>,
    /// Expense per day, in date order. Days without expenses are omitted.
    pub daily_expense: Vec<DailyExpense>,
    /// Budget amount per category for the period, ordered by category name.
    ///
    /// If a category has more than one budget for the period, the last one wins.
    pub budget_by_category: BTreeMap<String, f64>,
}

/// Builds the chart series for `period` from that period's transactions and
/// all of the user's budgets.
pub fn chart_data(period: Period, transactions: &[Transaction], budgets: &[Budget]) -> ChartData {
    let expenses = transactions
        .iter()
        .filter(|transaction| transaction.effective_type() == TransactionType::Expense);

    let mut expense_by_category = BTreeMap::new();
    let mut totals_by_day: HashMap<Date, f64> = HashMap::new();

    for transaction in expenses {
        *expense_by_category
            .entry(transaction.category_name().to_owned())
            .or_insert(0.0) += transaction.amount;
        *totals_by_day.entry(transaction.date).or_insert(0.0) += transaction.amount;
    }

    let mut daily_expense: Vec<DailyExpense> = totals_by_day
        .into_iter()
        .map(|(date, amount)| DailyExpense { date, amount })
        .collect();
    daily_expense.sort_by_key(|day| day.date);

    let budget_by_category = budgets
        .iter()
        .filter(|budget| period.matches(budget.month, budget.year))
        .map(|budget| (budget.category_name().to_owned(), budget.amount))
        .collect();

    ChartData {
        expense_by_category,
        daily_expense,
        budget_by_category,
    }
}
