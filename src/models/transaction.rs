//! This file defines the type `Transaction`, the core input of the summary engine.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::models::{
    DatabaseID, UserID,
    category::{Category, TransactionType, UNCATEGORIZED_LABEL},
};

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build] and chain
/// [Transaction::category] to attach a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction in its store.
    pub id: DatabaseID,
    /// The user the transaction belongs to.
    pub user_id: UserID,
    /// When the transaction happened.
    pub date: Date,
    /// The non-negative amount of money.
    pub amount: f64,
    /// The type the transaction was recorded with.
    ///
    /// Aggregation ignores this field and uses [Transaction::effective_type].
    #[serde(default, rename = "type")]
    pub recorded_type: Option<TransactionType>,
    /// The category, if the transaction was categorised.
    #[serde(default)]
    pub category: Option<Category>,
}

impl Transaction {
    /// Create an uncategorised transaction.
    pub fn build(id: DatabaseID, user_id: UserID, amount: f64, date: Date) -> Self {
        Self {
            id,
            user_id,
            date,
            amount,
            recorded_type: None,
            category: None,
        }
    }

    /// Set the category of the transaction.
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the type the transaction was recorded with.
    pub fn recorded_type(mut self, kind: TransactionType) -> Self {
        self.recorded_type = Some(kind);
        self
    }

    /// The name of the category, or "Uncategorized" if there is none.
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map_or(UNCATEGORIZED_LABEL, |category| category.name.as_str())
    }

    /// The type used for aggregation.
    ///
    /// This is the category's type. Transactions without a category, or whose
    /// category has no type, count as [TransactionType::Expense] even if they
    /// were recorded as income.
    pub fn effective_type(&self) -> TransactionType {
        self.category
            .as_ref()
            .and_then(|category| category.kind)
            .unwrap_or(TransactionType::Expense)
    }
}
