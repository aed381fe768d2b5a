//! Report-date utilities: the default "last Sunday" date, user date parsing
//! and the zero-free `M/D/YYYY` display format.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{CalendarError, Result};

/// The most recent Sunday on or before `today`.
pub fn most_recent_sunday(today: NaiveDate) -> NaiveDate {
    let days_since_sunday = (today.weekday().num_days_from_monday() + 1) % 7;
    today - Duration::days(days_since_sunday.into())
}

/// Format a date as `M/D/YYYY` without leading zeros ("3/4/2025").
pub fn format_report_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Parse `M/D/YYYY`, `MM/DD/YYYY`, or the same with a two-digit year.
///
/// Two-digit years follow the POSIX `%y` pivot: 69-99 are 19xx, 00-68 are 20xx.
/// Year 0 is rejected.
pub fn parse_report_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    let invalid = || CalendarError::InvalidDateFormat(s.to_string());

    let parts: Vec<&str> = s.split('/').collect();
    let &[m, d, y] = parts.as_slice() else {
        return Err(invalid());
    };

    let digits = |p: &str, widths: &[usize]| {
        widths.contains(&p.len()) && p.bytes().all(|b| b.is_ascii_digit())
    };
    if !digits(m, &[1, 2]) || !digits(d, &[1, 2]) || !digits(y, &[2, 4]) {
        return Err(invalid());
    }

    let month: u32 = m.parse().map_err(|_| invalid())?;
    let day: u32 = d.parse().map_err(|_| invalid())?;
    let mut year: i32 = y.parse().map_err(|_| invalid())?;
    if y.len() == 2 {
        year += if year >= 69 { 1900 } else { 2000 };
    }
    if year == 0 {
        return Err(invalid());
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}
