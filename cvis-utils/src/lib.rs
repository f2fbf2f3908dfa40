//! Shared utility functions for CVIS crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::NaiveDate;

    /// US style date format: "MM-DD-YYYY". Tried first.
    pub const US_FORMAT: &str = "%m-%d-%Y";

    /// ISO date format: "YYYY-MM-DD".
    pub const ISO_FORMAT: &str = "%Y-%m-%d";

    /// Text values that stand for a missing date rather than a malformed one.
    const MISSING_MARKERS: [&str; 5] = ["nan", "nat", "na", "null", "none"];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(ISO_FORMAT).to_string()
    }

    /// Returns true if the text denotes a missing value (empty, NaN, NA, null).
    pub fn is_missing(s: &str) -> bool {
        let trimmed = s.trim();
        trimmed.is_empty()
            || MISSING_MARKERS
                .iter()
                .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    }

    /// Parse a date string in either "MM-DD-YYYY" or "YYYY-MM-DD" format.
    ///
    /// The US form is tried first; the error only surfaces when neither
    /// format matches.
    pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
        let trimmed = s.trim();
        NaiveDate::parse_from_str(trimmed, US_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_FORMAT))
            .map_err(|_| DateError(format!("unrecognized date {trimmed:?}")))
    }

    /// Parse an optional date: missing markers give `Ok(None)`, anything else
    /// must match one of the two accepted formats.
    pub fn parse_date_opt(s: &str) -> Result<Option<NaiveDate>, DateError> {
        if is_missing(s) {
            return Ok(None);
        }
        parse_date(s).map(Some)
    }

    /// Whole days from `from` to `to` (positive when `to` is later).
    ///
    /// A missing endpoint yields `None` ("no value") instead of an error.
    pub fn days_between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<i64> {
        match (from, to) {
            (Some(from), Some(to)) => Some((to - from).num_days()),
            _ => None,
        }
    }

    /// [`days_between`] on raw text in either accepted format.
    pub fn days_between_str(from: &str, to: &str) -> Result<Option<i64>, DateError> {
        let from = parse_date_opt(from)?;
        let to = parse_date_opt(to)?;
        Ok(days_between(from, to))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_parse_both_formats() {
            let expected = NaiveDate::from_ymd_opt(2020, 3, 23).unwrap();
            assert_eq!(parse_date("03-23-2020").unwrap(), expected);
            assert_eq!(parse_date("2020-03-23").unwrap(), expected);
            assert_eq!(parse_date(" 2020-03-23 ").unwrap(), expected);
        }

        #[test]
        fn test_parse_rejects_other_formats() {
            assert!(parse_date("2020/03/23").is_err());
            assert!(parse_date("20200323").is_err());
            assert!(parse_date("13-45-2020").is_err());
            let err = parse_date("yesterday").unwrap_err();
            assert!(err.to_string().contains("yesterday"));
        }

        #[test]
        fn test_missing_dates_are_not_errors() {
            assert_eq!(parse_date_opt("").unwrap(), None);
            assert_eq!(parse_date_opt("NaN").unwrap(), None);
            assert_eq!(parse_date_opt("NA").unwrap(), None);
            assert!(parse_date_opt("not-a-date").is_err());
        }

        #[test]
        fn test_days_between() {
            let a = NaiveDate::from_ymd_opt(2020, 2, 27).unwrap();
            let b = NaiveDate::from_ymd_opt(2020, 3, 2).unwrap();
            // 2020 is a leap year: Feb 28, Feb 29, Mar 1, Mar 2
            assert_eq!(days_between(Some(a), Some(b)), Some(4));
            assert_eq!(days_between(Some(b), Some(a)), Some(-4));
            assert_eq!(days_between(Some(a), Some(a)), Some(0));
            assert_eq!(days_between(None, Some(a)), None);
            assert_eq!(days_between(Some(a), None), None);
        }

        #[test]
        fn test_days_between_mixed_formats() {
            assert_eq!(days_between_str("03-01-2020", "2020-03-11").unwrap(), Some(10));
            assert_eq!(days_between_str("nan", "2020-03-11").unwrap(), None);
            assert!(days_between_str("03/01/2020", "2020-03-11").is_err());
        }

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2020, 4, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2020-04-15");
            assert_eq!(parse_date(&formatted).unwrap(), date);
        }
    }
}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
