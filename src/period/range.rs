//! Inclusive calendar date ranges

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use super::error::PeriodError;

/// Inclusive `[start, end]` range of calendar dates, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    #[serde(rename = "startDate")]
    start: NaiveDate,
    #[serde(rename = "endDate")]
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    #[serde(rename = "startDate", alias = "start")]
    start: NaiveDate,
    #[serde(rename = "endDate", alias = "end")]
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = PeriodError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvalidRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// Parse a range from two `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> Result<Self, PeriodError> {
        DateRange::new(parse_date(start)?, parse_date(end)?)
    }

    /// Single-day range
    pub fn day(date: NaiveDate) -> Self {
        DateRange { start: date, end: date }
    }

    /// The `days` days ending at (and including) `end`
    pub fn ending_at(end: NaiveDate, days: u32) -> Result<Self, PeriodError> {
        let span = i64::from(days.max(1)) - 1;
        let start = end
            .checked_sub_signed(Duration::days(span))
            .ok_or(PeriodError::OutOfRange(end))?;
        DateRange::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive day count
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the range, in order
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_date(s: &str) -> Result<NaiveDate, PeriodError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| PeriodError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_reversed_range() {
        let err = DateRange::parse("2024-03-12", "2024-03-10").unwrap_err();
        assert!(matches!(err, PeriodError::InvalidRange { .. }));
    }

    #[test]
    fn test_rejects_non_calendar_date() {
        assert_eq!(
            DateRange::parse("2023-02-30", "2023-03-01").unwrap_err(),
            PeriodError::InvalidDate("2023-02-30".to_string())
        );
    }

    #[test]
    fn test_days_and_iteration() {
        let range = DateRange::parse("2024-02-28", "2024-03-01").unwrap();
        assert_eq!(range.days(), 3);
        let days: Vec<String> = range.iter_days().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2024-02-28", "2024-02-29", "2024-03-01"]);
        assert!(range.contains(parse_date("2024-02-29").unwrap()));
    }

    #[test]
    fn test_ending_at() {
        let end = parse_date("2024-03-12").unwrap();
        let range = DateRange::ending_at(end, 7).unwrap();
        assert_eq!(range.start(), parse_date("2024-03-06").unwrap());
        assert_eq!(range.days(), 7);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: DateRange =
            serde_json::from_str(r#"{"startDate":"2024-03-10","endDate":"2024-03-12"}"#).unwrap();
        assert_eq!(ok.days(), 3);
        let bad = serde_json::from_str::<DateRange>(r#"{"start":"2024-03-12","end":"2024-03-10"}"#);
        assert!(bad.is_err());
    }
}
