use serde::{Deserialize, Serialize};

use crate::models::{
    UserID,
    category::{Category, UNKNOWN_CATEGORY_LABEL},
};

/// A spending limit for one category in one month.
///
/// `month` and `year` are kept as stored. Budgets with out-of-range values
/// simply never match a requested period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The user the budget belongs to.
    pub user_id: UserID,
    /// The category the limit applies to.
    #[serde(default)]
    pub category: Option<Category>,
    /// The month number, 1-12.
    pub month: u8,
    /// The calendar year.
    pub year: i32,
    /// The amount of money budgeted.
    pub amount: f64,
}

impl Budget {
    /// Create a new budget.
    pub fn new(
        user_id: UserID,
        category: Option<Category>,
        month: u8,
        year: i32,
        amount: f64,
    ) -> Self {
        Self {
            user_id,
            category,
            month,
            year,
            amount,
        }
    }

    /// The name of the category, or "Unknown" if there is none.
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map_or(UNKNOWN_CATEGORY_LABEL, |category| category.name.as_str())
    }
}
