//! The aggregated view of one user's finances for one month.

use serde::Serialize;

use crate::charts::ChartData;

/// Fixed explanation of the four dashboard charts.
pub const CHART_LEGEND: &str = "1) Income vs Expense (bar): compares total income and expense.
2) Category-wise Spending (pie): shows which categories take most expense.
3) Monthly Trend (line): compares this month vs last month expense.
4) Budget vs Actual (bars): shows category budget vs spent, within/over.";

/// Totals, breakdowns and report text for one (user, month, year).
///
/// The text fields are already ranked and truncated. Consumers display them
/// as-is rather than re-deriving anything from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// The month number, 1-12.
    pub month: u8,
    /// The calendar year.
    pub year: i32,
    /// Sum of all income in the month.
    pub total_income: f64,
    /// Sum of all expenses in the month.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub net: f64,
    /// Top income categories, one per line.
    pub income_by_category: String,
    /// Top expense categories, one per line.
    pub expense_by_category: String,
    /// The budgets set for the month.
    pub budget: String,
    /// Each budget against what was actually spent.
    pub budget_vs_actual: String,
    /// Categories where spending exceeded the budget.
    pub overspend: String,
    /// This month's and last month's expenses.
    pub trend: String,
    /// Explanation of the dashboard charts.
    pub chart_legend: String,
    /// Expenses this month, as shown in the trend.
    pub this_month_expense: f64,
    /// Expenses in the previous calendar month, as shown in the trend.
    pub last_month_expense: f64,
    /// Raw series for the dashboard charts.
    pub charts: ChartData,
}
