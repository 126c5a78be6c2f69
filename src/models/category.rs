//! Categories group transactions and decide whether they count as income or expense.

use serde::{Deserialize, Serialize};

/// The label used for transactions that have no category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The label used for budgets that have no category.
pub const UNKNOWN_CATEGORY_LABEL: &str = "Unknown";

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

/// A named grouping of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The display name, also used as the key when matching budgets to spending.
    pub name: String,
    /// Whether transactions in this category are income or expense.
    ///
    /// Categories created before types were tracked may have no type.
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionType>,
}

impl Category {
    /// Create a category with a known type.
    pub fn new(name: &str, kind: TransactionType) -> Self {
        Self {
            name: name.to_owned(),
            kind: Some(kind),
        }
    }

    /// Create a category with no recorded type.
    pub fn untyped(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            kind: None,
        }
    }
}
