//! A monthly finance-summary engine.
//!
//! Given a user and a (month, year) period, the engine aggregates that
//! user's transactions and budgets into a [Summary]: totals, category
//! breakdowns, budget-vs-actual comparison, overspend list, month-over-month
//! trend and ready-to-display report text.
//!
//! Summaries are cached per (user, month, year) by [SummaryService] and stay
//! cached until a writer reports a change with [SummaryService::invalidate_summary]
//! or [SummaryService::handle_mutation].

#![warn(missing_docs)]

mod aggregation;
mod cache;
mod charts;
mod config;
mod data_source;
mod logging;
mod models;
mod mutation;
mod period;
mod report;
mod service;
mod summary;

pub use aggregation::{AggregationInput, aggregate};
pub use cache::{CacheKey, Generation, SummaryCache};
pub use charts::{ChartData, DailyExpense, chart_data};
pub use config::SummaryConfig;
pub use data_source::{DataSource, DataSourceError, MemoryDataSource, Records};
pub use logging::setup_logging;
pub use models::{
    Budget, Category, DatabaseID, Transaction, TransactionType, UNCATEGORIZED_LABEL,
    UNKNOWN_CATEGORY_LABEL, UserID,
};
pub use mutation::{MutationEvent, MutationKind};
pub use period::Period;
pub use report::{
    BUDGET_LINE_LIMIT, BUDGET_VS_ACTUAL_LINE_LIMIT, CurrencyFormat, EXPENSE_LINE_LIMIT,
    INCOME_LINE_LIMIT, NOT_AVAILABLE, OVERSPEND_LINE_LIMIT, TREND_LINE_LIMIT, format_lines,
    format_ranked,
};
pub use service::SummaryService;
pub use summary::{CHART_LEGEND, Summary};

/// The errors that may occur while producing a summary.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested month is not 1-12, or the year is not positive.
    ///
    /// This is checked before the data source is queried.
    #[error("{month}/{year} is not a valid period")]
    InvalidPeriod {
        /// The month number that was requested.
        month: u8,
        /// The year that was requested.
        year: i32,
    },

    /// The data source failed or did not answer in time.
    ///
    /// Callers may retry. Nothing is cached when this error occurs.
    #[error("summary data is unavailable: {0}")]
    DataUnavailable(String),

    /// The configured currency symbol cannot be used to format amounts.
    #[error("\"{0}\" cannot be used as a currency symbol")]
    InvalidCurrencySymbol(String),
}

impl From<DataSourceError> for Error {
    fn from(value: DataSourceError) -> Self {
        Error::DataUnavailable(value.to_string())
    }
}
