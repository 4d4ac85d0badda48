//! Period error types

use chrono::NaiveDate;

/// Errors from date range construction and comparison resolution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    /// Start date after end date
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// Input is not a calendar date (e.g. 2023-02-30)
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    /// Shifted date falls outside the representable calendar
    #[error("Shifted date out of range for {0}")]
    OutOfRange(NaiveDate),
    #[error("Unknown comparison mode '{0}'. Valid options: dod, wow, mom, yoy")]
    UnknownMode(String),
}
