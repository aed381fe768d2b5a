use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error(
        "report date {report_date} is before the start of this fiscal year ({first_start}); \
         update the fiscal calendar or the report date"
    )]
    OutOfRange {
        report_date: NaiveDate,
        first_start: NaiveDate,
    },

    #[error(
        "no fiscal period starts after {report_date}; the period table needs a trailing period \
         past the report window"
    )]
    NoFollowingPeriod { report_date: NaiveDate },

    #[error("invalid date format '{0}': use M/D/YYYY or MM/DD/YYYY")]
    InvalidDateFormat(String),

    #[error("fiscal period table is empty")]
    EmptyTable,

    #[error("fiscal period table is not strictly ascending at entry {index}")]
    UnsortedTable { index: usize },

    #[error("invalid fiscal period entry '{entry}': {reason}")]
    InvalidPeriodTable { entry: String, reason: String },
}

pub type Result<T> = std::result::Result<T, CalendarError>;
