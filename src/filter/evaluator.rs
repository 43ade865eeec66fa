//! Predicate evaluation
//!
//! One rule against one record yields a boolean. A rule list is a pure
//! conjunction: a record passes iff it passes every rule.
//!
//! # Discipline
//!
//! - Absent values (missing, null, blank, empty list) only satisfy the
//!   existence operators; every other operator returns false.
//! - Text comparisons are trimmed and case-insensitive.
//! - Numeric operators need both sides to parse as finite numbers.
//! - Date operators need both sides to parse as calendar instants.
//! - A value that cannot be coerced makes the predicate false, never an error.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde_json::Value;

use super::rule::{FilterOperator, FilterRule};
use crate::columns::{ColumnModel, DataKind};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::record::{is_absent, list_items, normalized, parse_date, parse_number, Record};

/// An orderable coercion of a value
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
enum Ordinal {
    Number(f64),
    Instant(NaiveDateTime),
}

/// Evaluates filter rules against records
///
/// Holds an optional column model; declared numeric or date columns pin how
/// relational operators coerce their operands.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredicateFilter<'a> {
    columns: Option<&'a ColumnModel>,
}

impl<'a> PredicateFilter<'a> {
    /// Create a filter that consults `columns` for declared types
    pub fn new(columns: &'a ColumnModel) -> Self {
        Self {
            columns: Some(columns),
        }
    }

    /// Create a filter that coerces purely from values
    pub fn untyped() -> Self {
        Self { columns: None }
    }

    /// Keeps the records passing every rule, preserving input order.
    ///
    /// An empty rule list returns the input unchanged.
    pub fn apply_all<'r, I>(&self, records: I, rules: &[FilterRule]) -> Vec<&'r Record>
    where
        I: IntoIterator<Item = &'r Record>,
    {
        let input = records.into_iter();
        if rules.is_empty() {
            return input.collect();
        }

        let mut scanned = 0usize;
        let kept: Vec<&Record> = input
            .inspect(|_| scanned += 1)
            .filter(|record| self.matches(record, rules))
            .collect();

        if Logger::enabled(Severity::Trace) {
            let rules_count = rules.len().to_string();
            let scanned = scanned.to_string();
            let matched = kept.len().to_string();
            log_event_with_fields(
                Event::FilterApplied,
                &[
                    ("matched", matched.as_str()),
                    ("rules", rules_count.as_str()),
                    ("scanned", scanned.as_str()),
                ],
            );
        }

        kept
    }

    /// Returns true if the record passes every rule
    pub fn matches(&self, record: &Record, rules: &[FilterRule]) -> bool {
        rules.iter().all(|rule| self.evaluate(record, rule))
    }

    /// Evaluates one rule against one record
    pub fn evaluate(&self, record: &Record, rule: &FilterRule) -> bool {
        let raw = record.get(&rule.field);
        let actual = match raw {
            Some(value) if !is_absent(raw) => value,
            _ => return rule.operator == FilterOperator::IsEmpty,
        };

        let values = &rule.values;
        match rule.operator {
            FilterOperator::Is => first(values).map_or(false, |v| text_is(actual, v)),
            FilterOperator::IsNot => first(values).map_or(false, |v| !text_is(actual, v)),
            FilterOperator::IsAnyOf => any_of(actual, values),
            FilterOperator::IsNotAnyOf => !any_of(actual, values),
            FilterOperator::Contains => {
                first(values).map_or(false, |v| text_test(actual, v, |a, b| a.contains(b)))
            }
            FilterOperator::NotContains => {
                first(values).map_or(false, |v| !text_test(actual, v, |a, b| a.contains(b)))
            }
            FilterOperator::StartsWith => {
                first(values).map_or(false, |v| text_test(actual, v, |a, b| a.starts_with(b)))
            }
            FilterOperator::EndsWith => {
                first(values).map_or(false, |v| text_test(actual, v, |a, b| a.ends_with(b)))
            }
            FilterOperator::Equals => first(values).map_or(false, |v| equals(actual, v)),
            FilterOperator::NotEquals => first(values).map_or(false, |v| !equals(actual, v)),
            FilterOperator::GreaterThan => {
                self.relation(&rule.field, actual, first(values)) == Some(Ordering::Greater)
            }
            FilterOperator::LessThan => {
                self.relation(&rule.field, actual, first(values)) == Some(Ordering::Less)
            }
            FilterOperator::Between => self.in_range(&rule.field, actual, values) == Some(true),
            FilterOperator::NotBetween => {
                self.in_range(&rule.field, actual, values) == Some(false)
            }
            FilterOperator::Before => chronology(actual, first(values)) == Some(Ordering::Less),
            FilterOperator::After => chronology(actual, first(values)) == Some(Ordering::Greater),
            FilterOperator::IncludesAll => includes_all(actual, values),
            FilterOperator::ExcludesAll => excludes_all(actual, values),
            FilterOperator::IsEmpty => false,
            FilterOperator::IsNotEmpty => true,
        }
    }

    fn declared_kind(&self, field: &str) -> Option<DataKind> {
        self.columns.and_then(|model| model.declared_kind(field))
    }

    /// Coerces every operand with one mode: the declared kind, else numeric
    /// when all parse as numbers, else dates when all parse as dates.
    fn coerce_all(&self, field: &str, operands: &[&Value]) -> Option<Vec<Ordinal>> {
        let numbers = || {
            operands
                .iter()
                .map(|v| parse_number(v).map(Ordinal::Number))
                .collect::<Option<Vec<_>>>()
        };
        let instants = || {
            operands
                .iter()
                .map(|v| parse_date(v).map(Ordinal::Instant))
                .collect::<Option<Vec<_>>>()
        };

        match self.declared_kind(field) {
            Some(DataKind::Numeric) => numbers(),
            Some(DataKind::Date) => instants(),
            _ => numbers().or_else(instants),
        }
    }

    fn relation(&self, field: &str, actual: &Value, expected: Option<&Value>) -> Option<Ordering> {
        let expected = expected?;
        let coerced = self.coerce_all(field, &[actual, expected])?;
        coerced[0].partial_cmp(&coerced[1])
    }

    /// Inclusive range test; bounds may come in either order.
    ///
    /// `None` when the rule or the value cannot be coerced.
    fn in_range(&self, field: &str, actual: &Value, bounds: &[Value]) -> Option<bool> {
        if bounds.len() != 2 {
            return None;
        }
        let coerced = self.coerce_all(field, &[actual, &bounds[0], &bounds[1]])?;
        let (value, a, b) = (coerced[0], coerced[1], coerced[2]);
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Some(value >= low && value <= high)
    }
}

fn first(values: &[Value]) -> Option<&Value> {
    values.first()
}

fn text_is(actual: &Value, expected: &Value) -> bool {
    let target = normalized(expected);
    list_items(actual)
        .into_iter()
        .any(|item| normalized(item) == target)
}

fn text_test(actual: &Value, expected: &Value, test: impl Fn(&str, &str) -> bool) -> bool {
    let needle = normalized(expected);
    list_items(actual)
        .into_iter()
        .any(|item| test(&normalized(item), &needle))
}

fn normalized_set(values: &[Value]) -> HashSet<String> {
    values
        .iter()
        .filter(|v| !is_absent(Some(*v)))
        .map(normalized)
        .collect()
}

fn any_of(actual: &Value, values: &[Value]) -> bool {
    let wanted = normalized_set(values);
    list_items(actual)
        .into_iter()
        .any(|item| wanted.contains(&normalized(item)))
}

fn includes_all(actual: &Value, values: &[Value]) -> bool {
    let present: HashSet<String> = list_items(actual).into_iter().map(normalized).collect();
    normalized_set(values).iter().all(|v| present.contains(v))
}

fn excludes_all(actual: &Value, values: &[Value]) -> bool {
    let present: HashSet<String> = list_items(actual).into_iter().map(normalized).collect();
    normalized_set(values).iter().all(|v| !present.contains(v))
}

fn equals(actual: &Value, expected: &Value) -> bool {
    match (parse_number(actual), parse_number(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => normalized(actual) == normalized(expected),
    }
}

fn chronology(actual: &Value, expected: Option<&Value>) -> Option<Ordering> {
    let a = parse_date(actual)?;
    let b = parse_date(expected?)?;
    Some(a.cmp(&b))
}
