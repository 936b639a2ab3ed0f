//! Calendar helpers.
//!
//! Every date in the tracker is a `NaiveDate` rendered as ISO `YYYY-MM-DD`,
//! which is also the suffix of every per-day store key.

use crate::error::{MagicError, Result};
use chrono::{Datelike, Months, NaiveDate};

/// ISO date format used in store keys
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO `YYYY-MM-DD` string
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| MagicError::InvalidDate(s.to_string()))
}

/// Format a date as ISO `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(chrono::Days::new(offset)).unwrap_or(date)
}

/// Whether `date` falls inside the Monday-start week beginning at `start`
pub fn in_week(date: NaiveDate, start: NaiveDate) -> bool {
    let days = (date - start).num_days();
    (0..7).contains(&days)
}

/// 1-based day of the year
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(MagicError::InvalidRange {
                start: format_date(start),
                end: format_date(end),
            });
        }
        Ok(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    /// All days of a calendar month (month is 1-based)
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| MagicError::InvalidDate(format!("{:04}-{:02}", year, month)))?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| MagicError::InvalidDate(format!("{:04}-{:02}", year, month)))?;
        Ok(Self { start, end })
    }

    /// Previous month plus the month containing `today`, as shown on the streak calendar
    pub fn calendar_window(today: NaiveDate) -> Result<Self> {
        let current = Self::month(today.year(), today.month())?;
        let prev_start = current
            .start
            .checked_sub_months(Months::new(1))
            .ok_or_else(|| MagicError::InvalidDate(format_date(today)))?;
        Ok(Self {
            start: prev_start,
            end: current.end,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days in the range
    pub fn len(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate every date in the range, oldest first
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}
