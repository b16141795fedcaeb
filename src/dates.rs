//! Date parsing and the date-derived query parameters used by billing calls.

use crate::error::{Error, Result};
use chrono::{Datelike, Local, Months, NaiveDate};

/// Accepted command-line date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the default O365 billing window.
pub const DEFAULT_RANGE_MONTHS: u32 = 6;

/// Parses `YYYY-MM-DD` into a calendar date.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|e| {
        Error::Argument(format!(
            "Invalid date '{}': {} (expected YYYY-MM-DD)",
            text, e
        ))
    })
}

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Milliseconds since the Unix epoch at midnight UTC of `date`.
pub fn epoch_millis(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
}

/// A billing period expressed as year and month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting `start` after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::Argument(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }
        Ok(DateRange { start, end })
    }

    /// The `months` calendar months ending on `end`.
    ///
    /// Day-of-month is kept; it is clamped to the last day when the start
    /// month is shorter (e.g. Aug 31 minus six months is Feb 28/29).
    pub fn trailing_months(end: NaiveDate, months: u32) -> Self {
        let start = end
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);
        DateRange { start, end }
    }

    /// Query pairs `startYear, startMonth, endYear, endMonth`.
    pub fn month_query(&self) -> Vec<(&'static str, String)> {
        let start = YearMonth::from(self.start);
        let end = YearMonth::from(self.end);
        vec![
            ("startYear", start.year.to_string()),
            ("startMonth", start.month.to_string()),
            ("endYear", end.year.to_string()),
            ("endMonth", end.month.to_string()),
        ]
    }

    /// Query pairs `start, end` as epoch milliseconds.
    pub fn millis_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start", epoch_millis(self.start).to_string()),
            ("end", epoch_millis(self.end).to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid_date() {
        let parsed = parse_date("2021-11-05").unwrap();
        assert_eq!(parsed.year(), 2021);
        assert_eq!(parsed.month(), 11);
        assert_eq!(parsed.day(), 5);
    }

    #[test]
    fn test_parse_rejects_bad_month() {
        assert!(matches!(parse_date("2021-13-01"), Err(Error::Argument(_))));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_date("not-a-date").unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn test_parse_rejects_impossible_day() {
        assert!(parse_date("2021-02-30").is_err());
    }

    #[test]
    fn test_trailing_six_months() {
        let range = DateRange::trailing_months(date(2022, 3, 15), DEFAULT_RANGE_MONTHS);
        assert_eq!(range.start, date(2021, 9, 15));
        assert_eq!(range.end, date(2022, 3, 15));
    }

    #[test]
    fn test_trailing_months_clamps_short_month() {
        let range = DateRange::trailing_months(date(2022, 8, 31), 6);
        assert_eq!(range.start, date(2022, 2, 28));
    }

    #[test]
    fn test_range_rejects_inverted() {
        assert!(DateRange::new(date(2022, 2, 1), date(2022, 1, 1)).is_err());
        assert!(DateRange::new(date(2022, 1, 1), date(2022, 1, 1)).is_ok());
    }

    #[test]
    fn test_epoch_millis() {
        assert_eq!(epoch_millis(date(1970, 1, 1)), 0);
        assert_eq!(epoch_millis(date(2021, 11, 5)), 1_636_070_400_000);
    }

    #[test]
    fn test_month_query_order() {
        let range = DateRange::new(date(2021, 9, 15), date(2022, 3, 15)).unwrap();
        assert_eq!(
            range.month_query(),
            vec![
                ("startYear", "2021".to_string()),
                ("startMonth", "9".to_string()),
                ("endYear", "2022".to_string()),
                ("endMonth", "3".to_string()),
            ]
        );
    }
}
