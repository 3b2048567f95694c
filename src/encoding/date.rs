//! Timestamp grammar for the `date` element.
//!
//! The wire shape is a fixed ISO-8601 subset: the encoder always writes
//! `YYYY-MM-DDTHH:MM:SS.ffffffZ` (six fractional digits, trailing `Z`,
//! UTC). The parser accepts the same shape with the `Z` and the
//! fractional part optional, and nothing else. Other services rely on the
//! encoder's exact output, so parsing is done with literal splits on `T`,
//! `-`, `:` and `.` and rejects anything that does not fit, rather than
//! delegating to a lenient calendar parser.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::LlsdError;

/// Formats a timestamp in the fixed wire shape.
#[must_use]
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Parses a timestamp from its wire shape.
///
/// # Errors
///
/// Returns [`LlsdError::InvalidTimestamp`] when the text does not split
/// into the expected fields or a field is out of range.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, LlsdError> {
    parse_fields(raw).ok_or_else(|| LlsdError::InvalidTimestamp(raw.to_owned()))
}

fn parse_fields(raw: &str) -> Option<DateTime<Utc>> {
    let text = raw.strip_suffix('Z').unwrap_or(raw);
    let (date, time) = text.split_once('T')?;

    let date_fields: Vec<&str> = date.split('-').collect();
    let [year, month, day] = date_fields[..] else {
        return None;
    };
    let time_fields: Vec<&str> = time.split(':').collect();
    let [hour, minute, second] = time_fields[..] else {
        return None;
    };
    let (second, micros) = match second.split_once('.') {
        Some((whole, fraction)) => (whole, parse_fraction(fraction)?),
        None => (second, 0),
    };

    let naive = NaiveDate::from_ymd_opt(
        i32::try_from(parse_digits(year)?).ok()?,
        parse_digits(month)?,
        parse_digits(day)?,
    )?
    .and_hms_micro_opt(parse_digits(hour)?, parse_digits(minute)?, parse_digits(second)?, micros)?;
    Some(naive.and_utc())
}

/// Parses a non-empty all-digit field.
fn parse_digits(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Reads a fractional-second field as microseconds: digits beyond the
/// sixth are dropped, shorter fields are scaled up.
fn parse_fraction(fraction: &str) -> Option<u32> {
    let digits = parse_digits(fraction.get(..fraction.len().min(6))?)?;
    Some(digits * 10u32.pow(6 - fraction.len().min(6) as u32))
}
