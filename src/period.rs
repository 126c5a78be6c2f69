//! Calendar-month accounting periods.
//!
//! A [Period] is a validated (month, year) pair. It knows the inclusive date
//! range it covers and which period came before it.

use std::{fmt::Display, ops::RangeInclusive};

use time::{Date, Month};

use crate::Error;

/// One calendar month's accounting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    month: Month,
    year: i32,
}

impl Period {
    /// Create a period from a month number (1-12) and a year.
    ///
    /// # Errors
    /// Returns [Error::InvalidPeriod] if `month` is outside 1-12, `year` is not
    /// positive, or the year is too large to be represented as a calendar date.
    pub fn new(month: u8, year: i32) -> Result<Self, Error> {
        let invalid = || Error::InvalidPeriod { month, year };

        if year <= 0 {
            return Err(invalid());
        }

        let month = Month::try_from(month).map_err(|_| invalid())?;
        // Rejects years outside the range `time` can represent.
        Date::from_calendar_date(year, month, 1).map_err(|_| invalid())?;

        Ok(Self { month, year })
    }

    /// The month as a number from 1 to 12.
    pub fn month(&self) -> u8 {
        self.month as u8
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Whether a budget's raw (month, year) pair refers to this period.
    pub fn matches(&self, month: u8, year: i32) -> bool {
        self.month() == month && self.year == year
    }

    /// The period containing `date`.
    pub fn containing(date: Date) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    /// The immediately preceding calendar month, rolling back the year after January.
    pub fn previous(&self) -> Self {
        match self.month {
            Month::January => Self {
                month: Month::December,
                year: self.year - 1,
            },
            month => Self {
                month: month.previous(),
                year: self.year,
            },
        }
    }

    /// The immediately following calendar month, rolling over the year after December.
    pub fn next(&self) -> Self {
        match self.month {
            Month::December => Self {
                month: Month::January,
                year: self.year + 1,
            },
            month => Self {
                month: month.next(),
                year: self.year,
            },
        }
    }

    /// The first and last day of the month, inclusive.
    ///
    /// Returns `None` only for periods on the edge of the representable date
    /// range, e.g. the month before January of year 1.
    pub fn date_range(&self) -> Option<RangeInclusive<Date>> {
        let start = Date::from_calendar_date(self.year, self.month, 1).ok()?;
        let end =
            Date::from_calendar_date(self.year, self.month, self.month.length(self.year)).ok()?;

        Some(start..=end)
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month())
    }
}
