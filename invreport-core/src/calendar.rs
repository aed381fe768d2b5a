//! Fiscal period resolution.
//!
//! A [`FiscalCalendar`] owns an ascending table of fiscal-month start dates and a
//! report date. It answers three questions for the report header: which fiscal
//! month the report date falls in, when the next one starts, and what the labels
//! of the previous N months are.
//!
//! Relative months wrap around the end of the table, so a report early in the
//! fiscal year titles its prior-month columns with labels from the tail of the
//! *same* table. Labels are month names only, so this is usually what the report
//! wants, but the wrapped months really belong to the previous fiscal year.

use chrono::{Local, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CalendarError, Result};
use crate::time::{format_report_date, most_recent_sunday, parse_report_date};

/// Number of prior fiscal months the report titles.
pub const RELATIVE_MONTHS: usize = 5;

/// Fiscal year 2025 (4-4-5 style retail calendar).
const DEFAULT_TABLE: [(i32, u32, u32, &str); 12] = [
    (2024, 12, 29, "Jan"),
    (2025, 1, 26, "Feb"),
    (2025, 2, 23, "Mar"),
    (2025, 3, 30, "Apr"),
    (2025, 4, 27, "May"),
    (2025, 5, 25, "Jun"),
    (2025, 6, 29, "Jul"),
    (2025, 7, 27, "Aug"),
    (2025, 8, 24, "Sep"),
    (2025, 9, 28, "Oct"),
    (2025, 10, 26, "Nov"),
    (2025, 11, 23, "Dec"),
];

/// One fiscal month: the date it starts and its short label ("Jan").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalPeriod {
    pub start_date: NaiveDate,
    pub label: String,
}

impl FiscalPeriod {
    pub fn new(start_date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            start_date,
            label: label.into(),
        }
    }
}

/// The built-in fiscal period table.
pub fn default_periods() -> Vec<FiscalPeriod> {
    DEFAULT_TABLE
        .iter()
        .map(|&(y, m, d, label)| {
            let start = NaiveDate::from_ymd_opt(y, m, d).expect("built-in fiscal dates are valid");
            FiscalPeriod::new(start, label)
        })
        .collect()
}

/// Parse a period table such as `"12/29/2024=Jan, 1/26/2025=Feb"`.
///
/// Entries are separated by commas, semicolons or newlines. Each entry is
/// `DATE=LABEL` where DATE takes any shape [`parse_report_date`] accepts.
/// Ordering is not checked here; [`FiscalCalendar::new`] does that.
pub fn parse_period_table(text: &str) -> Result<Vec<FiscalPeriod>> {
    let mut periods = Vec::new();

    for entry in text.split([',', ';', '\n']) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let invalid = |reason: &str| CalendarError::InvalidPeriodTable {
            entry: entry.to_string(),
            reason: reason.to_string(),
        };

        let (date, label) = entry
            .split_once('=')
            .ok_or_else(|| invalid("expected DATE=LABEL"))?;
        let label = label.trim();
        if label.is_empty() {
            return Err(invalid("missing label"));
        }
        let start = parse_report_date(date).map_err(|e| invalid(&e.to_string()))?;

        periods.push(FiscalPeriod::new(start, label));
    }

    debug!("parsed {} fiscal periods", periods.len());
    Ok(periods)
}

fn validate_periods(periods: &[FiscalPeriod]) -> Result<()> {
    if periods.is_empty() {
        return Err(CalendarError::EmptyTable);
    }
    if let Some(i) = periods
        .windows(2)
        .position(|w| w[0].start_date >= w[1].start_date)
    {
        return Err(CalendarError::UnsortedTable { index: i + 1 });
    }
    Ok(())
}

/// Fiscal period table plus the date the report is run for.
///
/// Construct one per run and pass it by reference to whatever needs period
/// labels. The report date is expected to stay fixed while records are parsed.
#[derive(Debug, Clone)]
pub struct FiscalCalendar {
    periods: Vec<FiscalPeriod>,
    report_date: NaiveDate,
}

impl FiscalCalendar {
    /// Periods must be non-empty and strictly ascending by start date.
    pub fn new(periods: Vec<FiscalPeriod>, report_date: NaiveDate) -> Result<Self> {
        validate_periods(&periods)?;
        Ok(Self {
            periods,
            report_date,
        })
    }

    /// Report date defaults to the most recent Sunday (today if today is Sunday).
    pub fn with_default_report_date(periods: Vec<FiscalPeriod>) -> Result<Self> {
        Self::new(periods, most_recent_sunday(Local::now().date_naive()))
    }

    pub fn periods(&self) -> &[FiscalPeriod] {
        &self.periods
    }

    pub fn report_date(&self) -> NaiveDate {
        self.report_date
    }

    /// Report date as `M/D/YYYY`.
    pub fn report_date_str(&self) -> String {
        format_report_date(self.report_date)
    }

    /// Replace the report date from user text. On error the previous date is kept.
    pub fn set_report_date(&mut self, text: &str) -> Result<()> {
        let date = parse_report_date(text)?;
        self.set_report_date_value(date);
        Ok(())
    }

    pub fn set_report_date_value(&mut self, date: NaiveDate) {
        debug!("report date set to {}", format_report_date(date));
        self.report_date = date;
    }

    /// Replace the whole period table. On error the previous table is kept.
    pub fn set_periods(&mut self, periods: Vec<FiscalPeriod>) -> Result<()> {
        validate_periods(&periods)?;
        self.periods = periods;
        Ok(())
    }

    /// Number of periods starting on or before the report date.
    fn periods_started(&self) -> usize {
        self.periods.partition_point(|p| p.start_date <= self.report_date)
    }

    /// Index of the period containing the report date.
    fn current_index(&self) -> Result<usize> {
        self.periods_started()
            .checked_sub(1)
            .ok_or(CalendarError::OutOfRange {
                report_date: self.report_date,
                first_start: self.periods[0].start_date,
            })
    }

    /// First day of the fiscal month containing the report date.
    pub fn current_period(&self) -> Result<String> {
        let idx = self.current_index()?;
        Ok(format_report_date(self.periods[idx].start_date))
    }

    /// First day of the fiscal month after the report date.
    ///
    /// The table has no implicit next year: a report date inside the last
    /// period is a configuration error.
    pub fn next_period(&self) -> Result<String> {
        self.periods
            .get(self.periods_started())
            .map(|p| format_report_date(p.start_date))
            .ok_or(CalendarError::NoFollowingPeriod {
                report_date: self.report_date,
            })
    }

    /// Labels of the `n` fiscal months before the current one, keyed `-1..=-n`.
    pub fn relative_months(&self, n: usize) -> Result<BTreeMap<i32, String>> {
        let idx = self.current_index()? as i64;
        let len = self.periods.len() as i64;

        Ok((1..=n as i64)
            .map(|i| {
                let relative_idx = (idx - i).rem_euclid(len) as usize;
                (-(i as i32), self.periods[relative_idx].label.clone())
            })
            .collect())
    }
}
