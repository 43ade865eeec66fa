//! Record representation for tabledeck
//!
//! A record is one tabular row: a JSON object mapping field ids to scalar or
//! list values. Records are supplied in full on every call and are only ever
//! borrowed by the engine, never mutated.

mod coerce;

pub use coerce::{
    display_text, format_float, is_absent, list_items, looks_like_date, normalize_text,
    normalized, parse_date, parse_number,
};

use serde_json::{Map, Value};

/// One tabular row keyed by field id
pub type Record = Map<String, Value>;

/// Converts a JSON value into a record.
///
/// Returns `None` when the value is not a JSON object.
pub fn from_value(value: Value) -> Option<Record> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Reads a field from a record, treating absence as `None`.
pub fn field<'a>(record: &'a Record, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|v| !is_absent(Some(*v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_requires_object() {
        assert!(from_value(json!({"a": 1})).is_some());
        assert!(from_value(json!([1, 2])).is_none());
        assert!(from_value(json!("text")).is_none());
    }

    #[test]
    fn test_field_hides_absent_values() {
        let record = from_value(json!({"a": "", "b": null, "c": [], "d": "x"})).unwrap();

        assert!(field(&record, "a").is_none());
        assert!(field(&record, "b").is_none());
        assert!(field(&record, "c").is_none());
        assert!(field(&record, "missing").is_none());
        assert_eq!(field(&record, "d"), Some(&json!("x")));
    }
}
