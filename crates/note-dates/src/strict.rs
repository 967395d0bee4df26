//! Strict parsers for user-supplied `event_date` / `start_time` note fields.
//!
//! Unlike [`crate::normalize`], these never guess: input is either a
//! well-formed ISO date / `HH:MM` time or an error. Callers decide whether a
//! rejected field is left unset or reported back to the user.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{NormalizeError, Result};
use crate::normalize::parse_iso_date;

/// Parse an `event_date` field: an ISO 8601 date, or a datetime whose date
/// part is kept.
///
/// Whitespace is significant, apart from the single space allowed between
/// date and time.
///
/// # Errors
///
/// Returns [`NormalizeError::InvalidDate`] if the input is not an ISO 8601
/// date or datetime, or names a day that does not exist.
///
/// # Examples
///
/// ```
/// use note_dates::strict::parse_event_date;
///
/// let date = parse_event_date("2025-10-20T09:00:00").unwrap();
/// assert_eq!(date.to_string(), "2025-10-20");
/// assert!(parse_event_date("tomorrow").is_err());
/// ```
pub fn parse_event_date(s: &str) -> Result<NaiveDate> {
    parse_iso_date(s)
        .ok_or_else(|| NormalizeError::InvalidDate(format!("'{s}': expected an ISO 8601 date")))
}

/// Parse a `start_time` field in 24-hour `HH:MM` form.
///
/// # Errors
///
/// Returns [`NormalizeError::InvalidTime`] if the input is not a valid
/// `HH:MM` time.
pub fn parse_start_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|e| NormalizeError::InvalidTime(format!("'{s}': {e}")))
}
