//! Calendar date parsing.
//!
//! Transaction logs use either `YYYY-MM-DD` or `YYYY/MM/DD`.

use chrono::NaiveDate;
use thiserror::Error;

/// Error returned for date text in neither accepted format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date '{input}': expected YYYY-MM-DD or YYYY/MM/DD")]
pub struct DateError {
    /// The rejected input.
    pub input: String,
}

/// Parse a date in `YYYY-MM-DD` or `YYYY/MM/DD` form.
///
/// ```
/// use taxlot_core::parse_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2021, 1, 3).unwrap();
/// assert_eq!(parse_date("2021-01-03").unwrap(), expected);
/// assert_eq!(parse_date("2021/01/03").unwrap(), expected);
/// assert!(parse_date("01/03/2021").is_err());
/// ```
pub fn parse_date(text: &str) -> Result<NaiveDate, DateError> {
    let text = text.trim();
    let invalid = || DateError {
        input: text.to_string(),
    };
    // chrono accepts single-digit months and days, so check the shape first
    let format = match separator(text) {
        Some(b'/') => "%Y/%m/%d",
        Some(b'-') => "%Y-%m-%d",
        _ => return Err(invalid()),
    };
    NaiveDate::parse_from_str(text, format).map_err(|_| invalid())
}

/// The separator of a `YYYY?MM?DD` string, if it has exactly that shape.
fn separator(text: &str) -> Option<u8> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let sep = bytes[4];
    let digits_ok = bytes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 4 && *i != 7)
        .all(|(_, b)| b.is_ascii_digit());
    (digits_ok && bytes[7] == sep && matches!(sep, b'-' | b'/')).then_some(sep)
}

/// Whole calendar days from `earlier` to `later` (negative if reversed).
#[must_use]
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}
