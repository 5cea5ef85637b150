//! Time-of-day normalization.
//!
//! Parses free-form time input into a canonical [`MinuteOfDay`]. Accepts both
//! 24-hour (`"14:30"`) and 12-hour with meridiem (`"9:00 AM"`) forms. Pure and
//! deterministic; the current date plays no part.

use thiserror::Error;

use crate::core::types::MinuteOfDay;

/// Errors that can occur when normalizing time-of-day text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    /// Input was empty or whitespace.
    #[error("time input is empty")]
    Empty,

    /// Input did not match `HH:MM` or `H:MM AM/PM`.
    #[error("unrecognized time format: {0:?}")]
    Malformed(String),

    /// Hour was outside the valid range for the given form.
    #[error("hour out of range: {0}")]
    HourOutOfRange(u16),

    /// Minute was outside `[0, 59]`.
    #[error("minute out of range: {0}")]
    MinuteOutOfRange(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// Normalize free-form time-of-day text into a [`MinuteOfDay`].
///
/// Leading and trailing whitespace is ignored. The meridiem suffix is
/// case-insensitive and the space before it is optional, so `"9:00 AM"`,
/// `"9:00am"` and `"14:30"` all parse.
///
/// # Examples
///
/// ```
/// use dosette::core::timeparse::parse_time_of_day;
///
/// assert_eq!(parse_time_of_day("9:00 AM").unwrap().get(), 540);
/// assert_eq!(parse_time_of_day("14:30").unwrap().get(), 870);
/// assert!(parse_time_of_day("25:61").is_err());
/// ```
pub fn parse_time_of_day(raw: &str) -> Result<MinuteOfDay, TimeParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TimeParseError::Empty);
    }

    let (clock, meridiem) = split_meridiem(trimmed);
    let clock = clock.trim_end();

    let (hour_text, minute_text) = clock
        .split_once(':')
        .ok_or_else(|| TimeParseError::Malformed(trimmed.to_string()))?;

    let hour = parse_component(hour_text)
        .ok_or_else(|| TimeParseError::Malformed(trimmed.to_string()))?;
    let minute = parse_component(minute_text)
        .ok_or_else(|| TimeParseError::Malformed(trimmed.to_string()))?;

    if minute > 59 {
        return Err(TimeParseError::MinuteOutOfRange(minute));
    }

    let hour24 = match meridiem {
        None => {
            if hour > 23 {
                return Err(TimeParseError::HourOutOfRange(hour));
            }
            hour
        }
        Some(m) => {
            // 12-hour clock: hours run 1-12, with 12 AM meaning midnight
            // and 12 PM meaning noon.
            if hour == 0 || hour > 12 {
                return Err(TimeParseError::HourOutOfRange(hour));
            }
            match (m, hour) {
                (Meridiem::Am, 12) => 0,
                (Meridiem::Am, h) => h,
                (Meridiem::Pm, 12) => 12,
                (Meridiem::Pm, h) => h + 12,
            }
        }
    };

    // Both components are range-checked above, so this cannot fail.
    MinuteOfDay::from_hm(hour24, minute)
        .map_err(|_| TimeParseError::Malformed(trimmed.to_string()))
}

/// Split a trailing AM/PM suffix off the input, if present.
fn split_meridiem(text: &str) -> (&str, Option<Meridiem>) {
    let Some(idx) = text.len().checked_sub(2) else {
        return (text, None);
    };
    // `get` keeps non-ASCII input safe: a split mid-character is no suffix.
    match text.get(idx..) {
        Some(tail) if tail.eq_ignore_ascii_case("am") => (&text[..idx], Some(Meridiem::Am)),
        Some(tail) if tail.eq_ignore_ascii_case("pm") => (&text[..idx], Some(Meridiem::Pm)),
        _ => (text, None),
    }
}

/// Parse a one- or two-digit clock component.
fn parse_component(text: &str) -> Option<u16> {
    let text = text.trim();
    if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_24_hour_maps_to_minutes() {
        assert_eq!(parse_time_of_day("00:00").unwrap().get(), 0);
        assert_eq!(parse_time_of_day("9:00").unwrap().get(), 540);
        assert_eq!(parse_time_of_day("14:30").unwrap().get(), 14 * 60 + 30);
        assert_eq!(parse_time_of_day("23:59").unwrap().get(), 1439);
    }

    #[test]
    fn test_12_hour_with_meridiem() {
        assert_eq!(parse_time_of_day("9:00 AM").unwrap().get(), 540);
        assert_eq!(parse_time_of_day("9:00 PM").unwrap().get(), 21 * 60);
        assert_eq!(parse_time_of_day("1:25 pm").unwrap().get(), 13 * 60 + 25);
    }

    #[test]
    fn test_midnight_and_noon_anchors() {
        assert_eq!(parse_time_of_day("12:00 AM").unwrap().get(), 0);
        assert_eq!(parse_time_of_day("12:00 PM").unwrap().get(), 720);
    }

    #[test]
    fn test_whitespace_ignored() {
        assert_eq!(parse_time_of_day("  9:00 AM  ").unwrap().get(), 540);
        assert_eq!(parse_time_of_day(" 14:30 ").unwrap().get(), 870);
    }

    #[test]
    fn test_meridiem_without_space() {
        assert_eq!(parse_time_of_day("9:00AM").unwrap().get(), 540);
        assert_eq!(parse_time_of_day("12:00pm").unwrap().get(), 720);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(
            parse_time_of_day("25:61"),
            Err(TimeParseError::MinuteOutOfRange(61))
        );
        assert_eq!(
            parse_time_of_day("24:00"),
            Err(TimeParseError::HourOutOfRange(24))
        );
        assert_eq!(
            parse_time_of_day("13:00 PM"),
            Err(TimeParseError::HourOutOfRange(13))
        );
        assert_eq!(
            parse_time_of_day("0:30 AM"),
            Err(TimeParseError::HourOutOfRange(0))
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_time_of_day(""), Err(TimeParseError::Empty));
        assert_eq!(parse_time_of_day("   "), Err(TimeParseError::Empty));
        assert!(matches!(
            parse_time_of_day("not a time"),
            Err(TimeParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_time_of_day("9"),
            Err(TimeParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_time_of_day("9:"),
            Err(TimeParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_time_of_day(":30"),
            Err(TimeParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_time_of_day("9:3 0"),
            Err(TimeParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_time_of_day("9:00 XM"),
            Err(TimeParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_time_of_day("💊"),
            Err(TimeParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_deterministic() {
        let first = parse_time_of_day("7:45 PM").unwrap();
        let second = parse_time_of_day("7:45 PM").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_24h_round_trip() {
        for hour in 0..24u16 {
            for minute in [0u16, 1, 30, 59] {
                let text = format!("{:02}:{:02}", hour, minute);
                let parsed = parse_time_of_day(&text).unwrap();
                assert_eq!(parsed.get(), hour * 60 + minute);
                assert_eq!(parsed.to_string(), text);
            }
        }
    }
}
