//! Turns one month of transactions and a user's budgets into a [Summary].
//!
//! Aggregation is pure and never fails: missing categories and category types
//! fall back to defaults instead of producing errors.

use std::collections::HashMap;

use crate::{
    charts::chart_data,
    models::{Budget, Transaction, TransactionType, UserID},
    period::Period,
    report::{
        BUDGET_LINE_LIMIT, BUDGET_VS_ACTUAL_LINE_LIMIT, CurrencyFormat, EXPENSE_LINE_LIMIT,
        INCOME_LINE_LIMIT, NOT_AVAILABLE, OVERSPEND_LINE_LIMIT, TREND_LINE_LIMIT, format_lines,
        format_ranked, or_not_available,
    },
    summary::{CHART_LEGEND, Summary},
};

const NO_OVERSPEND: &str = "None";

/// The transactions and budgets needed to summarise one period.
#[derive(Debug, Clone, Copy)]
pub struct AggregationInput<'a> {
    /// Transactions dated within the period.
    pub transactions: &'a [Transaction],
    /// Transactions dated within the previous calendar month.
    pub prior_month_transactions: &'a [Transaction],
    /// All of the user's budgets, for any period.
    pub budgets: &'a [Budget],
}

/// Income and expense totals, overall and per category.
#[derive(Debug, Default)]
struct Totals {
    income: f64,
    expense: f64,
    income_by_category: HashMap<String, f64>,
    expense_by_category: HashMap<String, f64>,
}

fn accumulate(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();

    for transaction in transactions {
        let (total, by_category) = match transaction.effective_type() {
            TransactionType::Income => (&mut totals.income, &mut totals.income_by_category),
            TransactionType::Expense => (&mut totals.expense, &mut totals.expense_by_category),
        };

        *total += transaction.amount;
        *by_category
            .entry(transaction.category_name().to_owned())
            .or_insert(0.0) += transaction.amount;
    }

    totals
}

fn total_expense(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.effective_type() == TransactionType::Expense)
        .map(|transaction| transaction.amount)
        .sum()
}

/// The three budget reports: budgets, budget vs actual, and overspend.
struct BudgetReports {
    budget: String,
    budget_vs_actual: String,
    overspend: String,
}

fn budget_reports(
    period: Period,
    budgets: &[Budget],
    expense_by_category: &HashMap<String, f64>,
    currency: &CurrencyFormat,
) -> BudgetReports {
    if budgets.is_empty() {
        return BudgetReports {
            budget: NOT_AVAILABLE.to_owned(),
            budget_vs_actual: NOT_AVAILABLE.to_owned(),
            overspend: NOT_AVAILABLE.to_owned(),
        };
    }

    let mut budget_lines = Vec::new();
    let mut comparison_lines = Vec::new();
    let mut overspend_lines = Vec::new();

    for budget in budgets
        .iter()
        .filter(|budget| period.matches(budget.month, budget.year))
    {
        let category = budget.category_name();
        let actual = expense_by_category.get(category).copied().unwrap_or(0.0);
        let diff = budget.amount - actual;
        let status = if diff >= 0.0 { "Within" } else { "Over" };

        budget_lines.push(format!(
            "{category}: {} ({} {})",
            currency.format(budget.amount),
            budget.month,
            budget.year
        ));
        comparison_lines.push(format!(
            "{category}: Budget {} | Spent {} | {status}",
            currency.format(budget.amount),
            currency.format(actual)
        ));

        if diff < 0.0 {
            overspend_lines.push(format!("{category}: Over by {}", currency.format(diff.abs())));
        }
    }

    let overspend = format_lines(&overspend_lines, OVERSPEND_LINE_LIMIT);

    BudgetReports {
        budget: or_not_available(format_lines(&budget_lines, BUDGET_LINE_LIMIT)),
        budget_vs_actual: or_not_available(format_lines(
            &comparison_lines,
            BUDGET_VS_ACTUAL_LINE_LIMIT,
        )),
        overspend: if overspend.is_empty() {
            NO_OVERSPEND.to_owned()
        } else {
            overspend
        },
    }
}

/// Summarise `user_id`'s finances for `period`.
///
/// `input.budgets` may contain budgets for any period; only those matching
/// `period` are reported. Transactions and budgets that belong to another
/// user are ignored.
pub fn aggregate(
    user_id: UserID,
    period: Period,
    input: AggregationInput<'_>,
    currency: &CurrencyFormat,
) -> Summary {
    let transactions: Vec<Transaction> = input
        .transactions
        .iter()
        .filter(|transaction| transaction.user_id == user_id)
        .cloned()
        .collect();
    let prior_month_transactions: Vec<Transaction> = input
        .prior_month_transactions
        .iter()
        .filter(|transaction| transaction.user_id == user_id)
        .cloned()
        .collect();
    let budgets: Vec<Budget> = input
        .budgets
        .iter()
        .filter(|budget| budget.user_id == user_id)
        .cloned()
        .collect();

    let totals = accumulate(&transactions);
    let reports = budget_reports(period, &budgets, &totals.expense_by_category, currency);

    let this_month_expense = totals.expense;
    let last_month_expense = total_expense(&prior_month_transactions);
    let trend_lines = [
        format!("This month: {}", currency.format(this_month_expense)),
        format!("Last month: {}", currency.format(last_month_expense)),
    ];

    Summary {
        month: period.month(),
        year: period.year(),
        total_income: totals.income,
        total_expense: totals.expense,
        net: totals.income - totals.expense,
        income_by_category: or_not_available(format_ranked(
            &totals.income_by_category,
            INCOME_LINE_LIMIT,
            currency,
        )),
        expense_by_category: or_not_available(format_ranked(
            &totals.expense_by_category,
            EXPENSE_LINE_LIMIT,
            currency,
        )),
        budget: reports.budget,
        budget_vs_actual: reports.budget_vs_actual,
        overspend: reports.overspend,
        trend: format_lines(&trend_lines, TREND_LINE_LIMIT),
        chart_legend: CHART_LEGEND.to_owned(),
        this_month_expense,
        last_month_expense,
        charts: chart_data(period, &transactions, &budgets),
    }
}
