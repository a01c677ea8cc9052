//! Budget / dashboard period
//!
//! A calendar month in canonical `YYYY-MM` form.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Calendar month, e.g. `2024-03`.
///
/// Holds the first day of the month and the first day of the following month,
/// so every transaction dated `start <= date < end` falls inside the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodMonth {
    start: NaiveDate,
    end: NaiveDate,
}

impl PeriodMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidMonth(format!("{:04}-{:02}", year, month));

        if !(1..=9999).contains(&year) {
            return Err(invalid());
        }
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let end = start
            .checked_add_months(Months::new(1))
            .ok_or_else(invalid)?;

        Ok(Self { start, end })
    }

    /// First day of the month (inclusive)
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day of the following month (exclusive)
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Last day of the month (inclusive)
    pub fn last_day(&self) -> NaiveDate {
        self.end.pred_opt().unwrap_or(self.start)
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }

    /// Whether `date` falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

impl fmt::Display for PeriodMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for PeriodMonth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidMonth(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        let (year, month) = (&s[..4], &s[5..]);
        if !digits(year) || !digits(month) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        PeriodMonth::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for PeriodMonth {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeriodMonth> for String {
    fn from(month: PeriodMonth) -> Self {
        month.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_canonical_month() {
        let month: PeriodMonth = "2024-03".parse().unwrap();
        assert_eq!(month.start(), date(2024, 3, 1));
        assert_eq!(month.end(), date(2024, 4, 1));
        assert_eq!(month.last_day(), date(2024, 3, 31));
        assert_eq!(month.to_string(), "2024-03");
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let month: PeriodMonth = "2023-12".parse().unwrap();
        assert_eq!(month.end(), date(2024, 1, 1));
        assert_eq!(month.last_day(), date(2023, 12, 31));
    }

    #[test]
    fn test_leap_february() {
        let month: PeriodMonth = "2024-02".parse().unwrap();
        assert_eq!(month.last_day(), date(2024, 2, 29));
    }

    #[test]
    fn test_contains_is_whole_month() {
        let month: PeriodMonth = "2024-03".parse().unwrap();
        assert!(month.contains(date(2024, 3, 1)));
        assert!(month.contains(date(2024, 3, 31)));
        assert!(!month.contains(date(2024, 2, 29)));
        assert!(!month.contains(date(2024, 4, 1)));
    }

    #[test]
    fn test_rejects_non_canonical_forms() {
        for input in ["2024-3", "2024-13", "2024-00", "24-03", "2024/03", "2024-03-01", "abcd-ef", "0000-01", ""] {
            assert_eq!(
                input.parse::<PeriodMonth>(),
                Err(ValidationError::InvalidMonth(input.to_string())),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_serde_as_string() {
        let month: PeriodMonth = serde_json::from_str("\"2025-11\"").unwrap();
        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2025-11\"");
        assert!(serde_json::from_str::<PeriodMonth>("\"2025-1\"").is_err());
    }
}
