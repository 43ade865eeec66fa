//! Record ordering
//!
//! Sorting is stable: records tied on every key keep their input order.
//! Absent values sort last under either direction.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde_json::Value;

use super::keys::{SortDirection, SortKey};
use crate::columns::{ColumnModel, DataKind};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::record::{field, is_absent, normalized, parse_date, parse_number, Record};

/// A value decorated for one sort key
#[derive(Debug, Clone, PartialEq)]
enum SortCell {
    Absent,
    Number(f64),
    Instant(NaiveDateTime),
    Text(String),
}

impl SortCell {
    /// Decorates one value. A declared kind forces that reading, and values
    /// that do not parse under it sort with the absent ones. Without a
    /// declared kind each value is read on its own: number, else date, else text.
    fn of(value: Option<&Value>, declared: Option<DataKind>) -> Self {
        let value = match value {
            Some(v) if !is_absent(Some(v)) => v,
            _ => return SortCell::Absent,
        };
        match declared {
            Some(DataKind::Numeric) => parse_number(value).map_or(SortCell::Absent, SortCell::Number),
            Some(DataKind::Date) => parse_date(value).map_or(SortCell::Absent, SortCell::Instant),
            Some(DataKind::Text) => SortCell::Text(normalized(value)),
            None => parse_number(value)
                .map(SortCell::Number)
                .or_else(|| parse_date(value).map(SortCell::Instant))
                .unwrap_or_else(|| SortCell::Text(normalized(value))),
        }
    }

    /// Numbers, then dates, then text, then absent values
    fn rank(&self) -> u8 {
        match self {
            SortCell::Number(_) => 0,
            SortCell::Instant(_) => 1,
            SortCell::Text(_) => 2,
            SortCell::Absent => 3,
        }
    }

    /// Cells of different types keep their rank order under either direction;
    /// only same-type pairs follow `direction`.
    fn cmp_with(&self, other: &Self, direction: SortDirection) -> Ordering {
        let ordering = match (self, other) {
            (SortCell::Number(a), SortCell::Number(b)) => a.total_cmp(b),
            (SortCell::Instant(a), SortCell::Instant(b)) => a.cmp(b),
            (SortCell::Text(a), SortCell::Text(b)) => a.cmp(b),
            _ => return self.rank().cmp(&other.rank()),
        };
        apply_direction(ordering, direction)
    }
}

fn apply_direction(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Compares two field values.
///
/// - Absent values sort last regardless of direction
/// - Two numbers compare numerically
/// - Two dates compare chronologically
/// - Anything else compares as case-insensitive text
pub fn compare(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let a = a.filter(|v| !is_absent(Some(*v)));
    let b = b.filter(|v| !is_absent(Some(*v)));

    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a), Some(b)) => (a, b),
    };

    let ordering = if let (Some(x), Some(y)) = (parse_number(a), parse_number(b)) {
        x.total_cmp(&y)
    } else if let (Some(x), Some(y)) = (parse_date(a), parse_date(b)) {
        x.cmp(&y)
    } else {
        normalized(a).cmp(&normalized(b))
    };

    apply_direction(ordering, direction)
}

/// Sorts records by a key list
pub struct ResultSorter;

impl ResultSorter {
    /// Orders records by `keys` in priority order.
    ///
    /// A key on a column with a declared kind reads every value as that kind.
    /// Other keys read each value as a number, date or text on its own; within
    /// a key numbers come before dates, dates before text, and absent values
    /// last, whatever the direction. An empty key list returns the input
    /// unchanged.
    pub fn order_by<'r, I>(
        records: I,
        keys: &[SortKey],
        columns: Option<&ColumnModel>,
    ) -> Vec<&'r Record>
    where
        I: IntoIterator<Item = &'r Record>,
    {
        let records: Vec<&Record> = records.into_iter().collect();
        if keys.is_empty() || records.len() < 2 {
            return records;
        }

        let declared: Vec<Option<DataKind>> = keys
            .iter()
            .map(|key| columns.and_then(|model| model.declared_kind(&key.field)))
            .collect();

        let mut decorated: Vec<(Vec<SortCell>, &Record)> = records
            .into_iter()
            .map(|record| {
                let cells = keys
                    .iter()
                    .zip(&declared)
                    .map(|(key, kind)| SortCell::of(field(record, &key.field), *kind))
                    .collect();
                (cells, record)
            })
            .collect();

        // sort_by is stable
        decorated.sort_by(|(a, _), (b, _)| {
            keys.iter()
                .enumerate()
                .map(|(i, key)| a[i].cmp_with(&b[i], key.direction))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        if Logger::enabled(Severity::Trace) {
            let key_list = keys
                .iter()
                .map(|key| format!("{}:{}", key.field, key.direction))
                .collect::<Vec<_>>()
                .join(",");
            let count = decorated.len().to_string();
            log_event_with_fields(
                Event::SortApplied,
                &[("keys", key_list.as_str()), ("records", count.as_str())],
            );
        }

        decorated.into_iter().map(|(_, record)| record).collect()
    }
}
