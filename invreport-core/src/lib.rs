//! invreport-core: fiscal calendar and report-date handling for inventory reports

pub mod calendar;
pub mod error;
pub mod time;

pub use calendar::{
    default_periods, parse_period_table, FiscalCalendar, FiscalPeriod, RELATIVE_MONTHS,
};
pub use error::CalendarError;
pub use time::{format_report_date, most_recent_sunday, parse_report_date};
