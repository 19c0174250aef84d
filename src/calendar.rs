//! Month grid arithmetic and the navigation cursor.
//!
//! Weeks start on Sunday. A grid always covers whole weeks, so it begins
//! with the Sunday on or before the first of the month and ends with the
//! Saturday on or after its last day.

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate};

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("not a number: {0:?}")]
    NotNumeric(String),
    #[error("year out of range (1..=9999): {0}")]
    OutOfRange(String),
}

/// Reference date of the displayed month. The day component is the
/// selected day and always stays valid for its month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    date: NaiveDate,
}

impl CalendarCursor {
    pub fn new(date: NaiveDate) -> Self {
        CalendarCursor { date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        visible_days(self.date)
    }

    pub fn in_month(&self, date: NaiveDate) -> bool {
        date.year() == self.date.year() && date.month() == self.date.month()
    }

    pub fn jump_to(&mut self, date: NaiveDate) {
        if year_in_range(date.year()) {
            self.date = date;
        }
    }

    /// Moves by whole months. A day past the end of the target month is
    /// clamped to its last day (Jan 31 + 1 month = Feb 28/29).
    pub fn shift_month(&mut self, delta: i32) {
        let months = self.date.year() as i64 * 12 + self.date.month0() as i64 + delta as i64;
        let year = months.div_euclid(12);
        let month = months.rem_euclid(12) as u32 + 1;
        let Ok(year) = i32::try_from(year) else {
            return;
        };
        if !year_in_range(year) {
            return;
        }
        if let Some(date) = clamped_date(year, month, self.date.day()) {
            self.date = date;
        }
    }

    pub fn shift_days(&mut self, delta: i64) {
        if let Some(date) = self
            .date
            .checked_add_signed(ChronoDuration::days(delta))
        {
            self.jump_to(date);
        }
    }

    /// Keeps month and day; Feb 29 becomes Feb 28 in a common year.
    pub fn set_year(&mut self, year: i32) -> Result<(), CalendarError> {
        if !year_in_range(year) {
            return Err(CalendarError::OutOfRange(year.to_string()));
        }
        if let Some(date) = clamped_date(year, self.date.month(), self.date.day()) {
            self.date = date;
        }
        Ok(())
    }

    /// Applies free-form year text. On error the cursor is unchanged.
    pub fn set_year_input(&mut self, input: &str) -> Result<i32, CalendarError> {
        let year = parse_year(input)?;
        self.set_year(year)?;
        Ok(year)
    }
}

/// Reads the leading integer of `input`: leading whitespace and one sign
/// are allowed, anything after the digits is ignored ("2020abc" is 2020).
pub fn parse_year(input: &str) -> Result<i32, CalendarError> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return Err(CalendarError::NotNumeric(input.to_string()));
    }
    let digits = &rest[..digits_len];
    let signed = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    let year = signed
        .parse::<i32>()
        .map_err(|_| CalendarError::OutOfRange(signed.clone()))?;
    if !year_in_range(year) {
        return Err(CalendarError::OutOfRange(signed));
    }
    Ok(year)
}

/// Dates shown for the month of `reference`, padded to whole weeks.
pub fn visible_days(reference: NaiveDate) -> Vec<NaiveDate> {
    let first = first_of_month(reference);
    let last = last_of_month(reference);
    let lead = first.weekday().num_days_from_sunday() as i64;
    let trail = 6 - last.weekday().num_days_from_sunday() as i64;
    let start = first
        .checked_sub_signed(ChronoDuration::days(lead))
        .unwrap_or(first);
    let end = last
        .checked_add_signed(ChronoDuration::days(trail))
        .unwrap_or(last);
    start.iter_days().take_while(|d| *d <= end).collect()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(days_in_month(date.year(), date.month()))
        .unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt()).map(|d| d.day()).unwrap_or(31)
}

pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn month_title(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
}

fn year_in_range(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}
