//! The interface to wherever transactions and budgets are stored.
//!
//! The summary engine only reads through [DataSource]. [MemoryDataSource] is
//! an in-memory implementation used by the `summary` binary and by tests.

use std::{
    future::Future,
    ops::RangeInclusive,
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicBool, Ordering},
    },
};

use serde::Deserialize;
use time::Date;

use crate::models::{Budget, Transaction, UserID};

/// Errors a [DataSource] may return.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DataSourceError {
    /// The store could not be reached or the query failed.
    #[error("the data store is unreachable: {0}")]
    Unreachable(String),

    /// The store did not answer within the configured time.
    #[error("the data store did not respond in time")]
    TimedOut,
}

/// Supplies a user's transactions and budgets.
///
/// Implementations must be safe to share between tasks.
pub trait DataSource: Send + Sync {
    /// Fetch the transactions of `user_id` dated within `date_range` (inclusive).
    fn fetch_transactions(
        &self,
        user_id: UserID,
        date_range: RangeInclusive<Date>,
    ) -> impl Future<Output = Result<Vec<Transaction>, DataSourceError>> + Send;

    /// Fetch all budgets of `user_id`, for every period.
    fn fetch_budgets(
        &self,
        user_id: UserID,
    ) -> impl Future<Output = Result<Vec<Budget>, DataSourceError>> + Send;
}

/// The records held by a [MemoryDataSource], in the shape of its JSON fixture files.
#[derive(Debug, Default, Deserialize)]
pub struct Records {
    /// Transactions for any user.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Budgets for any user.
    #[serde(default)]
    pub budgets: Vec<Budget>,
}

/// A [DataSource] that keeps everything in memory.
///
/// Writers are responsible for invalidating affected summaries, see
/// [MutationEvent](crate::MutationEvent).
#[derive(Debug, Default)]
pub struct MemoryDataSource {
    transactions: RwLock<Vec<Transaction>>,
    budgets: RwLock<Vec<Budget>>,
    unreachable: AtomicBool,
}

impl MemoryDataSource {
    /// Create an empty data source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a data source holding `records`.
    pub fn from_records(records: Records) -> Self {
        Self {
            transactions: RwLock::new(records.transactions),
            budgets: RwLock::new(records.budgets),
            unreachable: AtomicBool::new(false),
        }
    }

    /// Add a transaction.
    pub fn insert_transaction(&self, transaction: Transaction) {
        self.transactions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(transaction);
    }

    /// Add a budget.
    pub fn insert_budget(&self, budget: Budget) {
        self.budgets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(budget);
    }

    /// Remove the transaction with `id`, returning it if it existed.
    pub fn delete_transaction(&self, id: i64) -> Option<Transaction> {
        let mut transactions = self
            .transactions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let index = transactions
            .iter()
            .position(|transaction| transaction.id == id)?;

        Some(transactions.remove(index))
    }

    /// Make every fetch fail with [DataSourceError::Unreachable] while `unreachable` is true.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    fn check_reachable(&self) -> Result<(), DataSourceError> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(DataSourceError::Unreachable(
                "memory data source is switched off".to_owned(),
            ))
        } else {
            Ok(())
        }
    }
}

impl DataSource for MemoryDataSource {
    async fn fetch_transactions(
        &self,
        user_id: UserID,
        date_range: RangeInclusive<Date>,
    ) -> Result<Vec<Transaction>, DataSourceError> {
        self.check_reachable()?;

        let transactions = self
            .transactions
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        Ok(transactions
            .iter()
            .filter(|transaction| {
                transaction.user_id == user_id && date_range.contains(&transaction.date)
            })
            .cloned()
            .collect())
    }

    async fn fetch_budgets(&self, user_id: UserID) -> Result<Vec<Budget>, DataSourceError> {
        self.check_reachable()?;

        let budgets = self.budgets.read().unwrap_or_else(PoisonError::into_inner);

        Ok(budgets
            .iter()
            .filter(|budget| budget.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{DataSource, DataSourceError, MemoryDataSource, Records};
    use crate::models::{Budget, Transaction, UserID};

    #[tokio::test]
    async fn returns_transactions_in_date_range() {
        let user_id = UserID::new(1);
        let source = MemoryDataSource::new();
        source.insert_transaction(Transaction::build(1, user_id, 10.0, date!(2025 - 01 - 01)));
        source.insert_transaction(Transaction::build(2, user_id, 20.0, date!(2025 - 01 - 31)));
        source.insert_transaction(Transaction::build(3, user_id, 40.0, date!(2024 - 12 - 31)));
        source.insert_transaction(Transaction::build(4, user_id, 80.0, date!(2025 - 02 - 01)));

        let transactions = source
            .fetch_transactions(user_id, date!(2025 - 01 - 01)..=date!(2025 - 01 - 31))
            .await
            .unwrap();

        let ids: Vec<i64> = transactions.iter().map(|transaction| transaction.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn only_returns_records_of_user() {
        let source = MemoryDataSource::new();
        source.insert_transaction(Transaction::build(
            1,
            UserID::new(2),
            10.0,
            date!(2025 - 01 - 05),
        ));
        source.insert_budget(Budget::new(UserID::new(2), None, 1, 2025, 10.0));

        let user_id = UserID::new(1);
        let transactions = source
            .fetch_transactions(user_id, date!(2025 - 01 - 01)..=date!(2025 - 01 - 31))
            .await
            .unwrap();
        let budgets = source.fetch_budgets(user_id).await.unwrap();

        assert!(transactions.is_empty());
        assert!(budgets.is_empty());
    }

    #[tokio::test]
    async fn unreachable_source_fails() {
        let source = MemoryDataSource::new();
        source.set_unreachable(true);

        let result = source.fetch_budgets(UserID::new(1)).await;

        assert!(matches!(result, Err(DataSourceError::Unreachable(_))));
    }

    #[test]
    fn delete_transaction_removes_by_id() {
        let user_id = UserID::new(1);
        let source = MemoryDataSource::new();
        source.insert_transaction(Transaction::build(9, user_id, 10.0, date!(2025 - 01 - 01)));

        assert!(source.delete_transaction(9).is_some());
        assert!(source.delete_transaction(9).is_none());
    }

    #[test]
    fn parses_records_from_json() {
        let json = r#"{
            "transactions": [
                {"id": 1, "user_id": 1, "date": "2025-03-04", "amount": 12.5,
                 "category": {"name": "Food", "type": "EXPENSE"}},
                {"id": 2, "user_id": 1, "date": "2025-03-05", "amount": 100.0, "type": "INCOME"}
            ],
            "budgets": [
                {"user_id": 1, "category": {"name": "Food"}, "month": 3, "year": 2025, "amount": 50.0}
            ]
        }"#;

        let records: Records = serde_json::from_str(json).unwrap();

        assert_eq!(records.transactions.len(), 2);
        assert_eq!(records.transactions[0].date, date!(2025 - 03 - 04));
        assert_eq!(records.transactions[1].category, None);
        assert_eq!(records.budgets[0].category_name(), "Food");
    }
}
