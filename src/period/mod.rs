//! Date ranges and comparison periods (verb module)
//!
//! Resolves a primary date range plus a comparison mode into the baseline
//! range. Month and year shifts go through `calendar`, which owns all
//! end-of-month clamping.

pub mod calendar;
mod compare;
mod error;
mod range;

pub use compare::{comparison_range, ComparisonMode};
pub use error::PeriodError;
pub use range::{parse_date, DateRange};
