//! String format checks. Syntax only, no network or DNS lookups.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use url::Url;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Absolute URL with a scheme, e.g. `https://example.com/a`.
pub fn is_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

pub fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL.is_match(value)
}

/// Date-times without an offset, as YAML front matter writes them. Read as UTC.
const NAIVE_DATE_TIMES: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Accepts RFC 3339 timestamps, offset-less date-times (UTC) and plain
/// `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_DATE_TIMES
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn urls_must_be_absolute() {
        assert!(is_url("https://example.com"));
        assert!(is_url("mailto:hi@example.com"));
        assert!(!is_url("not-a-url"));
        assert!(!is_url("/relative/path"));
        assert!(!is_url(""));
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("jane.doe+news@example.co.uk"));
        assert!(!is_email("jane@localhost"));
        assert!(!is_email(".jane@example.com"));
        assert!(!is_email("jane..doe@example.com"));
        assert!(!is_email("no-at-sign.example.com"));
    }

    #[test]
    fn dates_and_timestamps_parse_to_utc() {
        assert_eq!(
            parse_date("2024-05-06"),
            Some(Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024-05-06T10:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 5, 6, 8, 30, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024-01-15 10:00:00"),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024-01-15T10:00:00"),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024-01-15 10:00:00.250").map(|d| d.timestamp_subsec_millis()),
            Some(250)
        );
        assert_eq!(parse_date("2024-01-15 25:00:00"), None);
        assert_eq!(parse_date("May 6th"), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }
}
