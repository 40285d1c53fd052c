// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Custom field rules used by the schema derives.

use chrono::NaiveDate;
use std::borrow::Cow;
use validator::ValidationError;

/// ISO-8601 UTC timestamp: `YYYY-MM-DDTHH:MM[:SS[.fraction]]Z`.
///
/// The date must exist on the calendar. Seconds are optional, leap seconds
/// and offsets other than `Z` are rejected.
pub fn iso_datetime(value: &str) -> Result<(), ValidationError> {
    if is_utc_datetime(value) {
        Ok(())
    } else {
        Err(ValidationError::new("datetime")
            .with_message(Cow::Borrowed("must be an ISO-8601 UTC timestamp")))
    }
}

fn is_utc_datetime(value: &str) -> bool {
    let Some((date, time)) = value
        .strip_suffix('Z')
        .and_then(|rest| rest.split_once('T'))
    else {
        return false;
    };
    is_calendar_date(date) && is_clock_time(time)
}

fn is_calendar_date(date: &str) -> bool {
    if date.len() != 10 || date.get(4..5) != Some("-") || date.get(7..8) != Some("-") {
        return false;
    }
    let field = |range: std::ops::Range<usize>| date.get(range).and_then(digits);
    match (field(0..4), field(5..7), field(8..10)) {
        (Some(year), Some(month), Some(day)) => {
            NaiveDate::from_ymd_opt(year as i32, month, day).is_some()
        }
        _ => false,
    }
}

fn is_clock_time(time: &str) -> bool {
    let (clock, fraction) = match time.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (time, None),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let clock_ok = match parts.as_slice() {
        [hour, minute] => fraction.is_none() && two_digits(hour, 23) && two_digits(minute, 59),
        [hour, minute, second] => {
            two_digits(hour, 23) && two_digits(minute, 59) && two_digits(second, 59)
        }
        _ => false,
    };

    clock_ok && fraction.map_or(true, is_digit_run)
}

fn two_digits(s: &str, max: u32) -> bool {
    s.len() == 2 && digits(s).is_some_and(|n| n <= max)
}

fn is_digit_run(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn digits(s: &str) -> Option<u32> {
    is_digit_run(s).then(|| s.parse().ok()).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_datetime_accepts_utc() {
        assert!(iso_datetime("2025-03-01T10:00:00Z").is_ok());
        assert!(iso_datetime("2025-03-01T10:00:00.123Z").is_ok());
        assert!(iso_datetime("2025-03-01T10:00:00.123456789012Z").is_ok());
        assert!(iso_datetime("2025-03-01T10:00Z").is_ok());
        assert!(iso_datetime("2024-02-29T23:59:59Z").is_ok());
    }

    #[test]
    fn test_iso_datetime_rejects_other_forms() {
        assert!(iso_datetime("2025-03-01T10:00:00+02:00").is_err());
        assert!(iso_datetime("2025-03-01 10:00:00Z").is_err());
        assert!(iso_datetime("2025-03-01").is_err());
        assert!(iso_datetime("yesterday").is_err());
        assert!(iso_datetime("2025-03-01T10:00:00.Z").is_err());
        assert!(iso_datetime("2025-03-01T10:00.5Z").is_err());
        assert!(iso_datetime("2025-03-01T1:00:00Z").is_err());
    }

    #[test]
    fn test_iso_datetime_rejects_impossible_values() {
        assert!(iso_datetime("2025-03-01T10:00:60Z").is_err());
        assert!(iso_datetime("2025-03-01T24:00:00Z").is_err());
        assert!(iso_datetime("2025-02-29T10:00:00Z").is_err());
        assert!(iso_datetime("2025-04-31T10:00:00Z").is_err());
        assert!(iso_datetime("2025-13-01T10:00:00Z").is_err());
    }
}
