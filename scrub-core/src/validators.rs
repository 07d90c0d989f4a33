// File: scrub-core/src/validators.rs
//! Programmatic validation functions for specific sensitive data types.
//!
//! Regular expressions describe the shape of a value but not whether it is
//! real. These checks run after a match and reject candidates that only look
//! like the target category, such as `99/99/2024` for a date.
//!
//! License: MIT OR APACHE 2.0

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A validator takes the matched text and decides whether it should be redacted.
pub type Validator = fn(&str) -> bool;

/// Returns the validator registered for a rule name, if any.
pub fn validator_for(rule_name: &str) -> Option<Validator> {
    match rule_name {
        "date" => Some(is_valid_date_programmatically),
        _ => None,
    }
}

static MONTHS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ]
    .into_iter()
    .zip(1..)
    .collect()
});

fn month_from_name(token: &str) -> Option<u32> {
    if token.len() < 3 || !token.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    MONTHS.get(token[..3].to_ascii_lowercase().as_str()).copied()
}

/// Parses a day or year token, tolerating an ordinal suffix (`15th`).
fn parse_number(token: &str) -> Option<u32> {
    let digits = token.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn expand_year(token: &str, value: u32) -> i32 {
    if token.len() == 2 { 2000 + value as i32 } else { value as i32 }
}

fn is_calendar_date(year: i32, month: u32, day: u32) -> bool {
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

/// Validates a matched date against the calendar.
///
/// Accepted shapes:
/// * `YYYY-MM-DD` (any of `-`, `/`, `.` as separators), read as year, month, day.
/// * `A/B/YY` or `A/B/YYYY`, accepted when either month/day or day/month is a real date.
///   Two-digit years are read as 20YY.
/// * Textual months (`Jan 15, 2024`, `15 January 2024`), with the day checked
///   against the month's length.
///
/// # Arguments
///
/// * `date` - The matched text.
///
/// # Returns
///
/// `true` if the text denotes an existing calendar date, `false` otherwise.
pub fn is_valid_date_programmatically(date: &str) -> bool {
    let tokens: Vec<&str> = date
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let [first, second, third] = tokens[..] else {
        return false;
    };

    if let Some(month) = tokens.iter().find_map(|t| month_from_name(t)) {
        let numbers: Vec<(&str, u32)> = tokens
            .iter()
            .filter(|t| month_from_name(t).is_none())
            .filter_map(|t| parse_number(t).map(|n| (*t, n)))
            .collect();
        let [(_, day), (year_token, year)] = numbers[..] else {
            return false;
        };
        return is_calendar_date(expand_year(year_token, year), month, day);
    }

    let (Some(a), Some(b), Some(c)) = (parse_number(first), parse_number(second), parse_number(third)) else {
        return false;
    };

    if first.len() == 4 {
        return is_calendar_date(a as i32, b, c);
    }

    let year = expand_year(third, c);
    is_calendar_date(year, a, b) || is_calendar_date(year, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_dates() {
        assert!(is_valid_date_programmatically("2024-01-15"));
        assert!(is_valid_date_programmatically("2024/2/29"));
        assert!(!is_valid_date_programmatically("2023-02-29"));
        assert!(!is_valid_date_programmatically("2024-13-01"));
    }

    #[test]
    fn numeric_dates_accept_either_order() {
        assert!(is_valid_date_programmatically("01/15/2024"));
        assert!(is_valid_date_programmatically("15/01/2024"));
        assert!(is_valid_date_programmatically("15.01.24"));
        assert!(!is_valid_date_programmatically("99/99/2024"));
        assert!(!is_valid_date_programmatically("0.0.15"));
    }

    #[test]
    fn textual_months() {
        assert!(is_valid_date_programmatically("Jan 15, 2024"));
        assert!(is_valid_date_programmatically("15 January 2024"));
        assert!(is_valid_date_programmatically("Sept. 3rd, 2021"));
        assert!(!is_valid_date_programmatically("Feb 30, 2024"));
    }

    #[test]
    fn only_date_has_a_validator() {
        assert!(validator_for("date").is_some());
        assert!(validator_for("email").is_none());
    }
}
