//! Comparison period resolution
//!
//! Derives the baseline range a primary range is compared against. The result
//! is never stored: callers recompute it whenever the primary range or the
//! mode changes.

use std::fmt;
use std::str::FromStr;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use super::calendar::{shift_months, shift_years};
use super::error::PeriodError;
use super::range::DateRange;

/// Rule for deriving a comparison range from a primary range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonMode {
    /// Same-length range immediately preceding the primary range
    Dod,
    /// Both endpoints shifted back 7 days
    Wow,
    /// Both endpoints shifted back one calendar month
    Mom,
    /// Both endpoints shifted back one calendar year
    Yoy,
}

impl ComparisonMode {
    pub const ALL: [ComparisonMode; 4] = [
        ComparisonMode::Dod,
        ComparisonMode::Wow,
        ComparisonMode::Mom,
        ComparisonMode::Yoy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonMode::Dod => "dod",
            ComparisonMode::Wow => "wow",
            ComparisonMode::Mom => "mom",
            ComparisonMode::Yoy => "yoy",
        }
    }

    /// Label shown next to comparison values in the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            ComparisonMode::Dod => "日环比",
            ComparisonMode::Wow => "周同比",
            ComparisonMode::Mom => "月同比",
            ComparisonMode::Yoy => "年同比",
        }
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonMode {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dod" => Ok(ComparisonMode::Dod),
            "wow" => Ok(ComparisonMode::Wow),
            "mom" => Ok(ComparisonMode::Mom),
            "yoy" => Ok(ComparisonMode::Yoy),
            _ => Err(PeriodError::UnknownMode(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ComparisonMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ComparisonMode::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for ComparisonMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Resolve the comparison range for `[start, end]`
///
/// Fails with [`PeriodError::InvalidRange`] when `start > end`.
pub fn comparison_range(
    start: NaiveDate,
    end: NaiveDate,
    mode: ComparisonMode,
) -> Result<DateRange, PeriodError> {
    DateRange::new(start, end)?.comparison(mode)
}

impl DateRange {
    /// The comparison range for this range under `mode`
    ///
    /// `mom` and `yoy` shift both endpoints by calendar months or years. When
    /// the end is clamped to a shorter month, the start moves back by the same
    /// days so the length is kept (`[03-30, 03-31]` maps to `[02-28, 02-29]`
    /// in 2024). If the shorter month cannot hold the range, as with a full
    /// 31-day month, each endpoint is clamped on its own.
    pub fn comparison(&self, mode: ComparisonMode) -> Result<DateRange, PeriodError> {
        let (start, end) = (self.start(), self.end());
        let (from, to) = match mode {
            ComparisonMode::Dod => {
                let len = self.days();
                (back_days(start, len)?, back_days(start, 1)?)
            }
            ComparisonMode::Wow => (back_days(start, 7)?, back_days(end, 7)?),
            ComparisonMode::Mom => calendar_shift(self, |d| shift_months(d, -1))?,
            ComparisonMode::Yoy => calendar_shift(self, |d| shift_years(d, -1))?,
        };
        tracing::debug!(%mode, primary_start = %start, primary_end = %end, %from, %to, "comparison range");
        DateRange::new(from, to)
    }
}

/// Shift both endpoints, carrying an end-of-month clamp over to the start
fn calendar_shift<F>(range: &DateRange, shift: F) -> Result<(NaiveDate, NaiveDate), PeriodError>
where
    F: Fn(NaiveDate) -> Option<NaiveDate>,
{
    let (start, end) = (range.start(), range.end());
    let from = shift(start).ok_or(PeriodError::OutOfRange(start))?;
    let to = shift(end).ok_or(PeriodError::OutOfRange(end))?;

    if to.day() < end.day() {
        let kept = back_days(to, range.days() - 1)?;
        if (kept.year(), kept.month()) == (from.year(), from.month()) {
            return Ok((kept, to));
        }
    }
    Ok((from, to))
}

fn back_days(date: NaiveDate, days: i64) -> Result<NaiveDate, PeriodError> {
    date.checked_sub_signed(Duration::days(days))
        .ok_or(PeriodError::OutOfRange(date))
}
