//! Booking date/time parsing.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::{Error, Result};

/// Offset-less layouts accepted from browser date/time inputs, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a loosely ISO-8601 timestamp.
pub fn parse_datetime(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(Error::InvalidDateTime(input.to_string()))
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
pub fn to_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Half-open interval `[start, end)` reserved by one booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BookingWindow {
    pub fn one_hour(start: DateTime<Utc>) -> Self {
        Self {
            start,
            end: start + Duration::hours(1),
        }
    }

    /// Parse `input` and reserve the following hour.
    pub fn parse(input: &str) -> Result<Self> {
        parse_datetime(input).map(Self::one_hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rfc3339_with_offset() {
        let dt = parse_datetime("2024-01-01T10:00:00-05:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 15, 0, 0).unwrap());
    }

    #[test]
    fn test_datetime_local_input() {
        let dt = parse_datetime("2024-03-09T14:30").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 0).unwrap());

        let dt = parse_datetime("2024-03-09 14:30:15").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 15).unwrap());
    }

    #[test]
    fn test_date_only_is_midnight() {
        let dt = parse_datetime("2024-03-09").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            parse_datetime("next tuesday"),
            Err(Error::InvalidDateTime(_))
        ));
    }

    #[test]
    fn test_one_hour_window() {
        let window = BookingWindow::parse("2024-01-01T10:00:00Z").unwrap();
        assert_eq!(to_iso(window.start), "2024-01-01T10:00:00.000Z");
        assert_eq!(to_iso(window.end), "2024-01-01T11:00:00.000Z");
    }
}
