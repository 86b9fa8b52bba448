//! Conversions between attribute text and the Rust types generated fields use.
//!
//! Parsers take the attribute name so that failures can say which attribute held the bad value.

use crate::error::Error;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::{fmt::Display, str::FromStr};

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Accepts the four lexical forms of `xs:boolean`.
pub fn parse_bool(name: &str, value: &str) -> Result<bool, Error> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::invalid_value(name, value, "expected true, false, 1 or 0")),
    }
}

pub fn parse_number<T>(name: &str, value: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|error| Error::invalid_value(name, value, error))
}

/// Formats `xs:float`/`xs:double` values, spelling the special values `INF`, `-INF` and `NaN`.
pub fn format_float<T: Display>(value: T) -> String {
    match value.to_string().as_str() {
        "inf" => "INF".to_string(),
        "-inf" => "-INF".to_string(),
        other => other.to_string(),
    }
}

pub fn parse_float<T>(name: &str, value: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: Display,
{
    let normalized = match value.trim() {
        "INF" | "+INF" => "inf",
        "-INF" => "-inf",
        "NaN" => "NaN",
        other => other,
    };
    normalized
        .parse()
        .map_err(|error| Error::invalid_value(name, value, error))
}

pub fn format_date_time(value: &NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

/// Accepts optional fractional seconds; a trailing `Z` is dropped since values carry no time
/// zone.
pub fn parse_date_time(name: &str, value: &str) -> Result<NaiveDateTime, Error> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|error| Error::invalid_value(name, value, error))
}

pub fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn parse_date(name: &str, value: &str) -> Result<NaiveDate, Error> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|error| Error::invalid_value(name, value, error))
}

pub fn format_time(value: &NaiveTime) -> String {
    value.format(TIME_FORMAT).to_string()
}

pub fn parse_time(name: &str, value: &str) -> Result<NaiveTime, Error> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S%.f")
        .map_err(|error| Error::invalid_value(name, value, error))
}
