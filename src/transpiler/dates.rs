//! Datetime parsing for START AT

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};

use crate::config::RFC3339_FORMAT;

/// Try each format in order and return the first success as RFC 3339.
///
/// Formats without an offset are read as UTC.
pub fn try_parse_date(value: &str, formats: &[String]) -> Option<String> {
    formats
        .iter()
        .find_map(|format| parse_with(value.trim(), format))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn parse_with(value: &str, format: &str) -> Option<DateTime<FixedOffset>> {
    if format.eq_ignore_ascii_case(RFC3339_FORMAT) {
        return DateTime::parse_from_rfc3339(value).ok();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
        return Some(dt.and_utc().fixed_offset());
    }
    NaiveDate::parse_from_str(value, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranspilerConfig;

    fn formats() -> Vec<String> {
        TranspilerConfig::default().date_formats
    }

    #[test]
    fn test_rfc3339_utc() {
        assert_eq!(
            try_parse_date("2021-06-22T15:21:03Z", &formats()).as_deref(),
            Some("2021-06-22T15:21:03Z")
        );
    }

    #[test]
    fn test_rfc3339_keeps_offset() {
        assert_eq!(
            try_parse_date("2021-06-22T15:21:03+02:00", &formats()).as_deref(),
            Some("2021-06-22T15:21:03+02:00")
        );
    }

    #[test]
    fn test_space_separated_datetime() {
        assert_eq!(
            try_parse_date("2021-06-22 08:00:00", &formats()).as_deref(),
            Some("2021-06-22T08:00:00Z")
        );
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        assert_eq!(
            try_parse_date("2021-06-22", &formats()).as_deref(),
            Some("2021-06-22T00:00:00Z")
        );
    }

    #[test]
    fn test_first_format_wins_and_order_matters() {
        let only_date = vec!["%Y-%m-%d".to_string()];
        assert_eq!(try_parse_date("2021-06-22T15:21:03Z", &only_date), None);
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(try_parse_date("YESTERDAY", &formats()), None);
        assert_eq!(try_parse_date("2021-13-01", &formats()), None);
    }
}
