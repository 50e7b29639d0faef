//! `yyyyMMdd` business date format
//!
//! A business date is eight ASCII digits naming a date that exists on the
//! proleptic Gregorian calendar from year 0001 onwards. `20110230`,
//! `20111301` and `00000101` are eight digits but are not valid.

use chrono::{Datelike, NaiveDate};

/// chrono pattern equivalent to `yyyyMMdd`
pub const DATE_PATTERN: &str = "%Y%m%d";

/// Length of a formatted business date
pub const DATE_LEN: usize = 8;

/// Parse a `yyyyMMdd` string into a calendar date
///
/// Returns `None` unless the value is exactly eight digits naming an
/// existing date. chrono alone accepts shorter month/day fields and year
/// 0000, so the width is checked first and year zero afterwards.
pub fn parse(value: &str) -> Option<NaiveDate> {
    if value.len() != DATE_LEN || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_PATTERN)
        .ok()
        .filter(|date| date.year() >= 1)
}

/// Check whether `value` is a valid `yyyyMMdd` calendar date
pub fn is_valid(value: &str) -> bool {
    parse(value).is_some()
}

/// Format a calendar date as `yyyyMMdd`
pub fn format(date: NaiveDate) -> String {
    date.format(DATE_PATTERN).to_string()
}
