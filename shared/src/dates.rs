//! Lenient calendar-date parsing for spreadsheet cells and form input.
//!
//! Parsing is soft-fail: anything that is not a recognizable date yields
//! `None` instead of an error.

use chrono::{NaiveDate, NaiveDateTime};

/// Formats tried in priority order; the first match wins.
pub const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%d-%m-%Y"];

/// Format used when writing dates back to a spreadsheet.
pub const STORAGE_FORMAT: &str = "%d.%m.%Y";

/// A raw value that may hold a date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateInput<'a> {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(&'a str),
    Empty,
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        DateInput::Text(value)
    }
}

impl<'a> From<Option<&'a str>> for DateInput<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(DateInput::Empty, DateInput::Text)
    }
}

/// Normalize `input` to a calendar date.
pub fn parse_date(input: DateInput<'_>) -> Option<NaiveDate> {
    match input {
        DateInput::Date(date) => Some(date),
        DateInput::DateTime(datetime) => Some(datetime.date()),
        DateInput::Text(text) => parse_date_str(text),
        DateInput::Empty => None,
    }
}

/// Try each of [`DATE_FORMATS`] against the trimmed text.
pub fn parse_date_str(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Render a date as `DD.MM.YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(STORAGE_FORMAT).to_string()
}
