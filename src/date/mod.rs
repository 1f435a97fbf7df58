//! Turns caller-supplied transaction dates into ledger timestamps.
//!
//! Accepted forms, tried in order:
//!
//! * RFC 3339, e.g. `2020-11-02T14:00:00Z` (any offset, normalized to UTC);
//! * a naive ISO date-time, `2020-11-02T14:00` or `2020-11-02T14:00:00`, read as UTC;
//! * the short `MM/DD hAM` form, e.g. `10/31 10AM`, placed in a caller-chosen year.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::ledger::Timestamp;

pub const DEFAULT_YEAR: i32 = 2020;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DateParseError {
    #[error("empty transaction date")]
    Empty,
    #[error("unrecognized transaction date {0:?}")]
    Unrecognized(String),
    #[error("transaction date {0:?} is not a valid calendar instant")]
    OutOfRange(String),
}

pub fn parse_transaction_date(input: &str, default_year: i32) -> Result<Timestamp, DateParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DateParseError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }
    parse_short_form(input, default_year)
}

// "10/31 10AM", "10/31  9pm", "1/2 12AM"
fn parse_short_form(input: &str, year: i32) -> Result<Timestamp, DateParseError> {
    let unrecognized = || DateParseError::Unrecognized(input.to_owned());

    let (date, hour) = input.split_once(char::is_whitespace).ok_or_else(unrecognized)?;
    let (month, day) = date.split_once('/').ok_or_else(unrecognized)?;
    let month: u32 = month.parse().map_err(|_| unrecognized())?;
    let day: u32 = day.parse().map_err(|_| unrecognized())?;

    let hour = hour.trim().to_ascii_uppercase();
    let (clock, pm) = if let Some(h) = hour.strip_suffix("AM") {
        (h, false)
    } else if let Some(h) = hour.strip_suffix("PM") {
        (h, true)
    } else {
        return Err(unrecognized());
    };
    let clock: u32 = clock.trim().parse().map_err(|_| unrecognized())?;
    if !(1..=12).contains(&clock) {
        return Err(DateParseError::OutOfRange(input.to_owned()));
    }
    let hour24 = match (clock, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateParseError::OutOfRange(input.to_owned()))?;
    let time = NaiveTime::from_hms_opt(hour24, 0, 0)
        .ok_or_else(|| DateParseError::OutOfRange(input.to_owned()))?;
    Ok(date.and_time(time).and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn parses_rfc3339_and_normalizes_offsets() {
        assert_eq!(
            parse_transaction_date("2020-11-02T14:00:00Z", DEFAULT_YEAR),
            Ok(utc(2020, 11, 2, 14))
        );
        assert_eq!(
            parse_transaction_date("2020-11-02T16:00:00+02:00", DEFAULT_YEAR),
            Ok(utc(2020, 11, 2, 14))
        );
    }

    #[test]
    fn parses_naive_iso_as_utc() {
        assert_eq!(
            parse_transaction_date("2020-01-10T00:00", DEFAULT_YEAR),
            Ok(utc(2020, 1, 10, 0))
        );
        assert_eq!(
            parse_transaction_date(" 2020-01-10T08:00:00 ", DEFAULT_YEAR),
            Ok(utc(2020, 1, 10, 8))
        );
    }

    #[test]
    fn parses_short_form_in_default_year() {
        assert_eq!(parse_transaction_date("10/31 10AM", DEFAULT_YEAR), Ok(utc(2020, 10, 31, 10)));
        assert_eq!(parse_transaction_date("10/31  2pm", DEFAULT_YEAR), Ok(utc(2020, 10, 31, 14)));
        assert_eq!(parse_transaction_date("1/2 12AM", 2021), Ok(utc(2021, 1, 2, 0)));
        assert_eq!(parse_transaction_date("1/2 12PM", 2021), Ok(utc(2021, 1, 2, 12)));
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_transaction_date("  ", DEFAULT_YEAR), Err(DateParseError::Empty));
        assert!(matches!(
            parse_transaction_date("yesterday", DEFAULT_YEAR),
            Err(DateParseError::Unrecognized(_))
        ));
        assert!(matches!(
            parse_transaction_date("10/31 10", DEFAULT_YEAR),
            Err(DateParseError::Unrecognized(_))
        ));
        assert!(matches!(
            parse_transaction_date("2/30 10AM", DEFAULT_YEAR),
            Err(DateParseError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_transaction_date("10/31 13PM", DEFAULT_YEAR),
            Err(DateParseError::OutOfRange(_))
        ));
    }
}
