//! Post date parsing and ordering

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a front-matter date string in the layouts authors actually write
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset, compared in UTC
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc())
}

/// Total order over date strings, oldest first.
///
/// Parseable dates compare temporally. Unparseable dates sort before every
/// parseable one and compare textually among themselves.
pub fn compare_dates(a: &str, b: &str) -> Ordering {
    (parse_date(a), a).cmp(&(parse_date(b), b))
}

/// Newest-first ordering used for post listings and search tie-breaks
pub fn newest_first(a: &str, b: &str) -> Ordering {
    compare_dates(b, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2024-01-15").is_some());
        assert!(parse_date("2024/01/15").is_some());
        assert!(parse_date("2024-01-15 10:30:00").is_some());
        assert!(parse_date("2024-01-15T10:30:00").is_some());
        assert!(parse_date("2024-01-15T10:30:00.250").is_some());
        assert!(parse_date("2024-01-15T10:30:00+09:00").is_some());
        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn test_compare_mixed_layouts_temporally() {
        // Textually "2024/01/02" > "2024-02-01", temporally it is older
        assert_eq!(compare_dates("2024/01/02", "2024-02-01"), Ordering::Less);
        assert_eq!(
            compare_dates("2024-01-01", "2024-01-01 00:00:00"),
            Ordering::Less
        );
    }

    #[test]
    fn test_unparseable_dates_sort_oldest() {
        assert_eq!(compare_dates("someday", "2020-01-01"), Ordering::Less);
        assert_eq!(compare_dates("", "someday"), Ordering::Less);
        assert_eq!(newest_first("2020-01-01", "someday"), Ordering::Less);
    }

    #[test]
    fn test_newest_first() {
        let mut dates = vec!["2023-05-01", "2024-02-01", "2024-01-01"];
        dates.sort_by(|a, b| newest_first(a, b));
        assert_eq!(dates, vec!["2024-02-01", "2024-01-01", "2023-05-01"]);
    }
}
