//! Value coercion shared by the filter, sort and statistics engines
//!
//! Every consumer must see the same coercion, otherwise a value could pass a
//! numeric filter yet be summarized as text. All functions here are total:
//! a value that cannot be coerced yields `None`, never an error.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::{Number, Value};

/// Symbols stripped from text before numeric parsing
const CURRENCY_SYMBOLS: [char; 6] = ['$', '€', '£', '¥', '₹', '₩'];

/// Date-time layouts accepted after RFC 3339
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Calendar-date layouts, interpreted as midnight
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Returns true if the value is absent: missing, null, blank text or an empty list.
pub fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Renders a value as display text.
///
/// Lists are joined with `", "`, integral numbers carry no decimals and null
/// renders as the empty string.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(display_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Formats a float without a trailing `.0` when it is integral.
pub fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    n.as_f64().map(format_float).unwrap_or_else(|| n.to_string())
}

/// Case-insensitive, trimmed form of a piece of text.
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Normalized display text of a value.
pub fn normalized(value: &Value) -> String {
    normalize_text(&display_text(value))
}

/// Parses a value as a finite number.
///
/// Text is accepted after stripping currency symbols, thousands separators and
/// whitespace. Booleans, lists and objects are never numeric.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_numeric_text(s),
        _ => None,
    }
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Parses a value as a calendar instant.
///
/// Only text is considered. Timezone-qualified instants are converted to UTC;
/// naive values are taken as-is.
pub fn parse_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(instant) = NaiveDateTime::parse_from_str(text, format) {
            return Some(instant);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\d{4}[-/]\d{1,2}[-/]\d{1,2}|\d{1,2}/\d{1,2}/\d{4})")
            .expect("date pattern is a valid regex")
    })
}

/// Returns true if the value is text shaped like a calendar date and parses as one.
pub fn looks_like_date(value: &Value) -> bool {
    match value {
        Value::String(s) => date_pattern().is_match(s) && parse_date_text(s.trim()).is_some(),
        _ => false,
    }
}

/// Items of a list value; a scalar counts as a one-item list.
pub fn list_items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().filter(|v| !is_absent(Some(*v))).collect(),
        other => vec![other],
    }
}
