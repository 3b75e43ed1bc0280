use chrono::{Datelike, NaiveDate, Utc};

use crate::error::ApiError;

/// Today's date in UTC. The summary and budget aggregations are anchored to
/// the calendar month this returns.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// First day of the month containing `date`.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Human-readable "Month Year" label, e.g. "August 2026".
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Parse a `YYYY-MM-DD` date from a request payload or query parameter.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(field, "Invalid date. Use the YYYY-MM-DD format."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn start_of_month_clamps_to_day_one() {
        assert_eq!(start_of_month(date(2026, 8, 31)), date(2026, 8, 1));
        assert_eq!(start_of_month(date(2026, 2, 1)), date(2026, 2, 1));
    }

    #[test]
    fn month_label_is_month_then_year() {
        assert_eq!(month_label(date(2026, 8, 15)), "August 2026");
        assert_eq!(month_label(date(2025, 1, 1)), "January 2025");
    }

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(parse_date("date", "2026-08-31").unwrap(), date(2026, 8, 31));
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        for bad in ["31-08-2026", "2026/08/31", "2026-13-01", "yesterday", ""] {
            let err = parse_date("date", bad).unwrap_err();
            assert!(matches!(err, ApiError::Validation { field: "date", .. }));
        }
    }
}
