// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared display formatting helpers.

use chrono::{DateTime, NaiveDate};

/// Shown for weddings without a date yet.
pub const UNDEFINED_DATE: &str = "Date to be defined";

/// Maximum digits kept by the phone mask.
const MAX_PHONE_DIGITS: usize = 11;

/// "Maria Clara & João Pedro" from full names, keeping at most the first two
/// words of each. Falls back to whichever name is present.
pub fn format_couple_names(bride_name: &str, groom_name: &str) -> String {
    let bride = short_name(bride_name);
    let groom = short_name(groom_name);

    match (bride.is_empty(), groom.is_empty()) {
        (false, false) => format!("{} & {}", bride, groom),
        (false, true) => bride,
        _ => groom,
    }
}

fn short_name(name: &str) -> String {
    name.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

/// Progressive `(XX) XXXXX-XXXX` mask over the digits of `value`.
pub fn format_phone_number(value: &str) -> String {
    let digits: String = value
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_PHONE_DIGITS)
        .collect();

    let len = digits.len();
    if len == 0 {
        String::new()
    } else if len > 10 {
        format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..])
    } else if len > 6 {
        format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..])
    } else if len > 2 {
        format!("({}) {}", &digits[..2], &digits[2..])
    } else {
        format!("({}", digits)
    }
}

/// Long-form wedding date ("May 1, 2027"), or a placeholder when the date is
/// missing or unreadable.
pub fn format_wedding_date(date: Option<&str>) -> String {
    date.and_then(parse_date)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| UNDEFINED_DATE.to_string())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
