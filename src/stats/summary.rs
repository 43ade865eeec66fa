//! Descriptive-statistics formulas
//!
//! `describe` and `compute_single` both read their numbers from a `Summary`,
//! so a single aggregate always equals the matching field of a description.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde_json::Value;

use super::value::{AggregateKind, StatValue};
use crate::columns::DataKind;
use crate::record::{display_text, parse_date, parse_number};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Statistics over a column's numeric values
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub total: f64,
    pub average: Option<f64>,
    pub median: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl NumericSummary {
    /// Summarizes the values that parse as numbers; the rest are skipped.
    pub fn from_values(values: &[&Value]) -> Self {
        let mut numbers: Vec<f64> = values.iter().filter_map(|v| parse_number(v)).collect();
        numbers.sort_by(f64::total_cmp);

        let count = numbers.len();
        let total: f64 = numbers.iter().sum();

        let median = match count {
            0 => None,
            n if n % 2 == 0 => Some((numbers[n / 2 - 1] + numbers[n / 2]) / 2.0),
            n => Some(numbers[n / 2]),
        };

        Self {
            count,
            total,
            average: (count > 0).then(|| total / count as f64),
            median,
            minimum: numbers.first().copied(),
            maximum: numbers.last().copied(),
        }
    }
}

/// Statistics over a column's calendar values
#[derive(Debug, Clone, PartialEq)]
pub struct DateSummary {
    pub count: usize,
    pub earliest: Option<NaiveDateTime>,
    pub latest: Option<NaiveDateTime>,
}

impl DateSummary {
    /// Summarizes the values that parse as dates; the rest are skipped.
    pub fn from_values(values: &[&Value]) -> Self {
        let instants: Vec<NaiveDateTime> = values.iter().filter_map(|v| parse_date(v)).collect();
        Self {
            count: instants.len(),
            earliest: instants.iter().min().copied(),
            latest: instants.iter().max().copied(),
        }
    }

    /// Whole days spanned, rounded up
    pub fn range_days(&self) -> Option<f64> {
        let (earliest, latest) = (self.earliest?, self.latest?);
        let millis = (latest - earliest).num_milliseconds() as f64;
        Some((millis / MILLIS_PER_DAY).ceil())
    }
}

/// Statistics over a column's values as text
#[derive(Debug, Clone, PartialEq)]
pub struct TextSummary {
    pub count: usize,
    pub unique: usize,
    pub most_common: Option<String>,
    pub most_common_count: usize,
}

impl TextSummary {
    /// Ties for most common go to the value encountered first.
    pub fn from_values(values: &[&Value]) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut first_seen: Vec<String> = Vec::new();

        for value in values {
            let text = display_text(value);
            let count = counts.entry(text.clone()).or_insert(0);
            if *count == 0 {
                first_seen.push(text);
            }
            *count += 1;
        }

        let mut most_common: Option<(&String, usize)> = None;
        for text in &first_seen {
            let count = counts.get(text).copied().unwrap_or(0);
            if most_common.map_or(true, |(_, best)| count > best) {
                most_common = Some((text, count));
            }
        }

        Self {
            count: values.len(),
            unique: first_seen.len(),
            most_common: most_common.map(|(text, _)| text.clone()),
            most_common_count: most_common.map_or(0, |(_, count)| count),
        }
    }
}

/// Summary of one column under its effective type
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Numeric(NumericSummary),
    Date(DateSummary),
    Text(TextSummary),
}

impl Summary {
    /// Summarizes present values under `kind`
    pub fn compute(kind: DataKind, values: &[&Value]) -> Self {
        match kind {
            DataKind::Numeric => Summary::Numeric(NumericSummary::from_values(values)),
            DataKind::Date => Summary::Date(DateSummary::from_values(values)),
            DataKind::Text => Summary::Text(TextSummary::from_values(values)),
        }
    }

    pub fn kind(&self) -> DataKind {
        match self {
            Summary::Numeric(_) => DataKind::Numeric,
            Summary::Date(_) => DataKind::Date,
            Summary::Text(_) => DataKind::Text,
        }
    }

    /// One aggregate; `NotApplicable` when the kind does not fit the summary
    pub fn value(&self, aggregate: AggregateKind) -> StatValue {
        match (self, aggregate) {
            (Summary::Numeric(s), AggregateKind::Count) => StatValue::Count(s.count),
            (Summary::Numeric(s), AggregateKind::Total) => StatValue::Number(s.total),
            (Summary::Numeric(s), AggregateKind::Average) => number(s.average),
            (Summary::Numeric(s), AggregateKind::Median) => number(s.median),
            (Summary::Numeric(s), AggregateKind::Minimum) => number(s.minimum),
            (Summary::Numeric(s), AggregateKind::Maximum) => number(s.maximum),

            (Summary::Date(s), AggregateKind::Count) => StatValue::Count(s.count),
            (Summary::Date(s), AggregateKind::Earliest) => date(s.earliest),
            (Summary::Date(s), AggregateKind::Latest) => date(s.latest),
            (Summary::Date(s), AggregateKind::RangeDays) => number(s.range_days()),

            (Summary::Text(s), AggregateKind::Count) => StatValue::Count(s.count),
            (Summary::Text(s), AggregateKind::UniqueValues) => StatValue::Count(s.unique),
            (Summary::Text(s), AggregateKind::MostCommon) => s
                .most_common
                .clone()
                .map_or(StatValue::NotApplicable, StatValue::Text),
            (Summary::Text(s), AggregateKind::MostCommonCount) => {
                StatValue::Count(s.most_common_count)
            }

            _ => StatValue::NotApplicable,
        }
    }

    /// Every applicable aggregate, in display order
    pub fn entries(&self) -> Vec<(AggregateKind, StatValue)> {
        AggregateKind::applicable_to(self.kind())
            .iter()
            .map(|kind| (*kind, self.value(*kind)))
            .collect()
    }
}

fn number(value: Option<f64>) -> StatValue {
    value.map_or(StatValue::NotApplicable, StatValue::Number)
}

fn date(value: Option<NaiveDateTime>) -> StatValue {
    value.map_or(StatValue::NotApplicable, StatValue::Date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn refs(values: &[Value]) -> Vec<&Value> {
        values.iter().collect()
    }

    #[test]
    fn test_numeric_summary_odd() {
        let values = vec![json!(3), json!("1"), json!("$2")];
        let summary = NumericSummary::from_values(&refs(&values));

        assert_eq!(summary.count, 3);
        assert_eq!(summary.total, 6.0);
        assert_eq!(summary.average, Some(2.0));
        assert_eq!(summary.median, Some(2.0));
        assert_eq!(summary.minimum, Some(1.0));
        assert_eq!(summary.maximum, Some(3.0));
    }

    #[test]
    fn test_numeric_summary_even_median() {
        let values = vec![json!(4), json!(1), json!(3), json!(2)];
        let summary = NumericSummary::from_values(&refs(&values));
        assert_eq!(summary.median, Some(2.5));
    }

    #[test]
    fn test_numeric_summary_skips_malformed() {
        let values = vec![json!(10), json!("oops"), json!(20)];
        let summary = NumericSummary::from_values(&refs(&values));
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average, Some(15.0));
    }

    #[test]
    fn test_numeric_summary_empty() {
        let summary = Summary::compute(DataKind::Numeric, &[]);
        assert_eq!(summary.value(AggregateKind::Count), StatValue::Count(0));
        assert_eq!(summary.value(AggregateKind::Total), StatValue::Number(0.0));
        assert_eq!(summary.value(AggregateKind::Average), StatValue::NotApplicable);
        assert_eq!(summary.value(AggregateKind::Median), StatValue::NotApplicable);
    }

    #[test]
    fn test_date_summary_range_rounds_up() {
        let values = vec![json!("2023-01-01T00:00:00"), json!("2023-01-03T06:00:00")];
        let summary = DateSummary::from_values(&refs(&values));
        assert_eq!(summary.count, 2);
        assert_eq!(summary.range_days(), Some(3.0));
    }

    #[test]
    fn test_date_summary_single_value() {
        let values = vec![json!("2023-01-01")];
        let summary = DateSummary::from_values(&refs(&values));
        assert_eq!(summary.range_days(), Some(0.0));
        assert_eq!(summary.earliest, summary.latest);
    }

    #[test]
    fn test_text_summary_ties_go_to_first_seen() {
        let values = vec![json!("b"), json!("a"), json!("a"), json!("b"), json!("c")];
        let summary = TextSummary::from_values(&refs(&values));

        assert_eq!(summary.count, 5);
        assert_eq!(summary.unique, 3);
        assert_eq!(summary.most_common.as_deref(), Some("b"));
        assert_eq!(summary.most_common_count, 2);
    }

    #[test]
    fn test_inapplicable_kind() {
        let values = vec![json!("x")];
        let summary = Summary::compute(DataKind::Text, &refs(&values));
        assert_eq!(summary.value(AggregateKind::Average), StatValue::NotApplicable);
        assert_eq!(
            summary.value(AggregateKind::MostCommon),
            StatValue::Text("x".to_string())
        );
    }

    #[test]
    fn test_entries_follow_catalog() {
        let summary = Summary::compute(DataKind::Date, &[]);
        let kinds: Vec<AggregateKind> = summary.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, AggregateKind::applicable_to(DataKind::Date));
    }
}
