//! Date and time helpers for DATETIME columns

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Format of DATETIME values sent to the store
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_INPUTS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

const TIME_INPUTS: [&str; 3] = ["%H:%M:%S", "%H:%M", "%H:%M:%S%.f"];

/// Store-side keywords that evaluate to the current time
const NOW_KEYWORDS: [&str; 4] = ["now", "current_timestamp", "current_timestamp()", "now()"];

/// Zero dates the store accepts as column defaults
const ZERO_DATES: [&str; 2] = ["0000-00-00", "0000-00-00 00:00:00"];

/// Current local time as a DATETIME string
pub fn now() -> String {
    Local::now().format(DATETIME_FORMAT).to_string()
}

/// Converts a UNIX timestamp into a DATETIME string (UTC)
pub fn from_unix(timestamp: i64) -> Option<String> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.format(DATETIME_FORMAT).to_string())
}

/// Converts any accepted date/time string into a DATETIME string.
///
/// Dates without a time component are taken at midnight. Time-only inputs
/// and the "now" keywords cannot be normalized and return `None`.
pub fn normalize(s: &str) -> Option<String> {
    parse_datetime(s.trim()).map(|dt| dt.format(DATETIME_FORMAT).to_string())
}

/// Returns true if the string is a date, time, datetime, year or a
/// current-time keyword.
pub fn is_date_like(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    if NOW_KEYWORDS.iter().any(|kw| kw.eq_ignore_ascii_case(s)) || ZERO_DATES.contains(&s) {
        return true;
    }
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    parse_datetime(s).is_some() || TIME_INPUTS.iter().any(|f| NaiveTime::parse_from_str(s, f).is_ok())
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_INPUTS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_forms() {
        assert!(is_date_like("2024-01-31"));
        assert!(is_date_like("2024-01-31 23:59:59"));
        assert!(is_date_like("2024-01-31T23:59:59"));
        assert!(is_date_like("2024-01-31T23:59:59+02:00"));
        assert!(is_date_like("12:30:00"));
        assert!(is_date_like("12:30"));
        assert!(is_date_like("1999"));
    }

    #[test]
    fn test_accepts_now_keywords() {
        assert!(is_date_like("CURRENT_TIMESTAMP"));
        assert!(is_date_like("current_timestamp()"));
        assert!(is_date_like("NOW()"));
        assert!(is_date_like("now"));
    }

    #[test]
    fn test_accepts_zero_dates() {
        assert!(is_date_like("0000-00-00"));
        assert!(is_date_like("0000-00-00 00:00:00"));
        assert_eq!(normalize("0000-00-00"), None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(!is_date_like(""));
        assert!(!is_date_like("yesterday-ish"));
        assert!(!is_date_like("2024-13-01"));
        assert!(!is_date_like("2024-02-30"));
        assert!(!is_date_like("25:00:00"));
        assert!(!is_date_like("12345"));
    }

    #[test]
    fn test_from_unix() {
        assert_eq!(from_unix(0).as_deref(), Some("1970-01-01 00:00:00"));
        assert_eq!(from_unix(86_400 + 3_600).as_deref(), Some("1970-01-02 01:00:00"));
    }

    #[test]
    fn test_normalize_uses_24_hour_clock() {
        assert_eq!(normalize("2024-05-06T15:04:05").as_deref(), Some("2024-05-06 15:04:05"));
        assert_eq!(normalize("2024-05-06").as_deref(), Some("2024-05-06 00:00:00"));
        assert_eq!(normalize("12:00"), None);
    }

    #[test]
    fn test_now_is_normalized() {
        let n = now();
        assert_eq!(normalize(&n), Some(n.clone()));
    }
}
