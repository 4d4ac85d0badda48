//! Calendar arithmetic with end-of-month clamping
//!
//! Shifting a date by whole months or years keeps the day-of-month when the
//! target month has it and clamps to the target month's last day otherwise
//! (Jan 31 minus one month is Feb 28 or Feb 29; Feb 29 minus one year is Feb 28).

use chrono::{Datelike, NaiveDate};

/// Number of days in a calendar month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Shift a date by `months` calendar months (negative shifts go back)
///
/// Returns `None` only when the result falls outside chrono's date range.
pub fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total = date.year() * 12 + date.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Shift a date by `years` calendar years, clamping Feb 29 in non-leap years
pub fn shift_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    shift_months(date, years.checked_mul(12)?)
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    date - chrono::Duration::days(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[rstest]
    #[case("2024-03-15", -1, "2024-02-15")]
    #[case("2024-01-31", -1, "2023-12-31")]
    #[case("2024-03-31", -1, "2024-02-29")] // leap February
    #[case("2023-03-31", -1, "2023-02-28")]
    #[case("2024-01-31", 1, "2024-02-29")]
    #[case("2023-01-31", 1, "2023-02-28")]
    #[case("2024-05-31", -1, "2024-04-30")]
    #[case("2024-01-15", -13, "2022-12-15")]
    #[case("2024-12-31", 2, "2025-02-28")]
    fn test_shift_months(#[case] from: &str, #[case] months: i32, #[case] expected: &str) {
        assert_eq!(shift_months(d(from), months), Some(d(expected)));
    }

    #[rstest]
    #[case("2024-02-29", -1, "2023-02-28")]
    #[case("2024-02-29", -4, "2020-02-29")]
    #[case("2023-02-28", 1, "2024-02-28")]
    #[case("2024-03-10", -1, "2023-03-10")]
    fn test_shift_years(#[case] from: &str, #[case] years: i32, #[case] expected: &str) {
        assert_eq!(shift_years(d(from), years), Some(d(expected)));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
    }

    #[test]
    fn test_bucket_starts() {
        // 2024-03-13 is a Wednesday
        assert_eq!(week_start(d("2024-03-13")), d("2024-03-11"));
        assert_eq!(week_start(d("2024-03-11")), d("2024-03-11"));
        assert_eq!(week_start(d("2024-03-17")), d("2024-03-11"));
        assert_eq!(month_start(d("2024-03-17")), d("2024-03-01"));
    }
}
