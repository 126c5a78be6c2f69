//! This module defines the domain data types read by the summary engine.
//!
//! The engine never mutates these values. They are owned by whatever store
//! backs the [DataSource](crate::DataSource).

pub use budget::Budget;
pub use category::{Category, TransactionType, UNCATEGORIZED_LABEL, UNKNOWN_CATEGORY_LABEL};
pub use transaction::Transaction;
pub use user::UserID;

mod budget;
mod category;
mod transaction;
mod user;

/// Alias for the integer type used for record IDs.
pub type DatabaseID = i64;
