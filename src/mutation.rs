//! Events that writers emit after changing a user's transactions or budgets.
//!
//! The summary engine does not detect changes to the store by itself. Any
//! code that creates, updates or deletes a transaction or budget must pass a
//! [MutationEvent] to [SummaryService::handle_mutation](crate::SummaryService::handle_mutation)
//! (or call `invalidate_summary` directly) before later reads can be trusted.
//! An update that moves a transaction to another month is two events, one for
//! the old date and one for the new date.

use time::Date;

use crate::{Error, models::UserID, period::Period};

/// How a record changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// The record was added.
    Created,
    /// The record was changed in place.
    Updated,
    /// The record was removed.
    Deleted,
}

/// A change to a record that a cached summary may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationEvent {
    /// A transaction dated `date` changed.
    Transaction {
        /// The owner of the transaction.
        user_id: UserID,
        /// The date of the transaction.
        date: Date,
        /// How it changed.
        kind: MutationKind,
    },
    /// A budget for (`month`, `year`) changed.
    Budget {
        /// The owner of the budget.
        user_id: UserID,
        /// The budget's month number, 1-12.
        month: u8,
        /// The budget's year.
        year: i32,
        /// How it changed.
        kind: MutationKind,
    },
}

impl MutationEvent {
    /// The user whose data changed.
    pub fn user_id(&self) -> UserID {
        match self {
            MutationEvent::Transaction { user_id, .. } | MutationEvent::Budget { user_id, .. } => {
                *user_id
            }
        }
    }

    /// How the record changed.
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationEvent::Transaction { kind, .. } | MutationEvent::Budget { kind, .. } => *kind,
        }
    }

    /// The period the changed record belongs to.
    ///
    /// # Errors
    /// Returns [Error::InvalidPeriod] for a budget with an out-of-range month or year.
    pub fn period(&self) -> Result<Period, Error> {
        match self {
            MutationEvent::Transaction { date, .. } => Ok(Period::containing(*date)),
            MutationEvent::Budget { month, year, .. } => Period::new(*month, *year),
        }
    }

    /// Every period whose summary may be stale after this change.
    ///
    /// A transaction also affects the following month, whose trend reports
    /// this month's expenses. Budgets only affect their own month.
    pub fn affected_periods(&self) -> Result<Vec<Period>, Error> {
        let period = self.period()?;

        Ok(match self {
            MutationEvent::Transaction { .. } => vec![period, period.next()],
            MutationEvent::Budget { .. } => vec![period],
        })
    }
}
