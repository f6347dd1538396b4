//! Timestamp formatting
//!
//! Renders times as hour:minute:second with a numeric hour, the way the
//! chat transcript shows message times.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Format the chat back end uses for reply timestamps
pub const SERVER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Hour cycle used when rendering a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockStyle {
    /// `2:05:09 PM`
    #[default]
    TwelveHour,
    /// `14:05:09`
    TwentyFourHour,
}

impl ClockStyle {
    fn pattern(self) -> &'static str {
        match self {
            ClockStyle::TwelveHour => "%-I:%M:%S %p",
            ClockStyle::TwentyFourHour => "%H:%M:%S",
        }
    }
}

impl fmt::Display for ClockStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockStyle::TwelveHour => write!(f, "twelve_hour"),
            ClockStyle::TwentyFourHour => write!(f, "twenty_four_hour"),
        }
    }
}

impl FromStr for ClockStyle {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "12" | "12h" | "twelve_hour" => Ok(ClockStyle::TwelveHour),
            "24" | "24h" | "twenty_four_hour" => Ok(ClockStyle::TwentyFourHour),
            other => Err(TimestampError::UnknownClockStyle(other.to_string())),
        }
    }
}

/// Timestamp errors
#[derive(Debug, Error, PartialEq)]
pub enum TimestampError {
    #[error("timestamp out of range: {0}ms")]
    OutOfRange(i64),

    #[error("invalid timestamp '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("unknown clock style '{0}' (expected 12 or 24)")]
    UnknownClockStyle(String),
}

/// Format a date as hour:minute:second
pub fn format_timestamp<Tz>(date: &DateTime<Tz>, clock: ClockStyle) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    date.format(clock.pattern()).to_string()
}

/// Format the current local time
pub fn format_now(clock: ClockStyle) -> String {
    format_timestamp(&Local::now(), clock)
}

/// Format Unix milliseconds in the given time zone
pub fn format_unix_millis<Tz>(ms: i64, tz: &Tz, clock: ClockStyle) -> Result<String, TimestampError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let utc = DateTime::from_timestamp_millis(ms).ok_or(TimestampError::OutOfRange(ms))?;
    Ok(format_timestamp(&utc.with_timezone(tz), clock))
}

/// Reformat a back-end timestamp (`2024-01-03 14:30:00`)
///
/// The back end stamps replies in its own local time without an offset,
/// so the value is rendered as-is.
pub fn format_server_timestamp(raw: &str, clock: ClockStyle) -> Result<String, TimestampError> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), SERVER_TIMESTAMP_FORMAT).map_err(|e| {
        TimestampError::Parse {
            input: raw.to_string(),
            reason: e.to_string(),
        }
    })?;
    Ok(naive.format(clock.pattern()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_twelve_hour_has_no_leading_zero() {
        let date = Utc.with_ymd_and_hms(2024, 1, 3, 14, 5, 9).unwrap();
        assert_eq!(format_timestamp(&date, ClockStyle::TwelveHour), "2:05:09 PM");

        let morning = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 1).unwrap();
        assert_eq!(format_timestamp(&morning, ClockStyle::TwelveHour), "12:00:01 AM");
    }

    #[test]
    fn test_twenty_four_hour() {
        let date = Utc.with_ymd_and_hms(2024, 1, 3, 14, 5, 9).unwrap();
        assert_eq!(format_timestamp(&date, ClockStyle::TwentyFourHour), "14:05:09");
    }

    #[test]
    fn test_unix_millis_in_offset() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            format_unix_millis(0, &plus_two, ClockStyle::TwentyFourHour).unwrap(),
            "02:00:00"
        );
        assert_eq!(
            format_unix_millis(i64::MAX, &Utc, ClockStyle::TwentyFourHour),
            Err(TimestampError::OutOfRange(i64::MAX))
        );
    }

    #[test]
    fn test_server_timestamp() {
        assert_eq!(
            format_server_timestamp("2024-01-03 14:30:00", ClockStyle::TwelveHour).unwrap(),
            "2:30:00 PM"
        );
        assert!(matches!(
            format_server_timestamp("yesterday", ClockStyle::TwelveHour),
            Err(TimestampError::Parse { .. })
        ));
    }

    #[test]
    fn test_clock_style_parsing() {
        assert_eq!("12".parse::<ClockStyle>().unwrap(), ClockStyle::TwelveHour);
        assert_eq!("24".parse::<ClockStyle>().unwrap(), ClockStyle::TwentyFourHour);
        assert_eq!(
            "Twenty_Four_Hour".parse::<ClockStyle>().unwrap(),
            ClockStyle::TwentyFourHour
        );
        assert!("13".parse::<ClockStyle>().is_err());
        assert_eq!(ClockStyle::default(), ClockStyle::TwelveHour);
    }
}
