use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::error::{AppError, AppResult};

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// key: billing-period -> calendar month addressed by (year, 1-based month)
///
/// Backed by the first day of the month so every value is a real calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::invalid(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(AppError::invalid(format!(
                "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
            )));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or_else(|| AppError::invalid(format!("{year}-{month} is not a calendar month")))
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date - chrono::Duration::days(i64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn succ(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
    }

    pub fn pred(&self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
    }

    /// Every calendar day of the month, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let month = self.month();
        self.first
            .iter_days()
            .take_while(move |day| day.month() == month)
    }

    pub fn day_count(&self) -> usize {
        self.days().count()
    }

    /// `"2025-Jul"` style label used for arrears lines.
    pub fn label(&self) -> String {
        self.first.format("%Y-%b").to_string()
    }

    /// Months from `self` through `last`, both inclusive. Empty when `last` precedes `self`.
    pub fn through(self, last: YearMonth) -> MonthRange {
        MonthRange {
            next: Some(self),
            last,
        }
    }
}

impl Serialize for YearMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.first.format("%Y-%m").to_string())
    }
}

/// Bounded walk over consecutive months; advances exactly one month per item.
#[derive(Debug, Clone)]
pub struct MonthRange {
    next: Option<YearMonth>,
    last: YearMonth,
}

impl Iterator for MonthRange {
    type Item = YearMonth;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|month| *month <= self.last)?;
        self.next = current.succ();
        Some(current)
    }
}
