use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The owner of transactions, budgets and summaries.
///
/// Serialised as a bare integer so record files can write `"user_id": 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserID(i64);

impl UserID {
    /// Wrap a raw user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw user ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
