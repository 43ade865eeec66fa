//! Statistics engine
//!
//! Type inference runs per call over the values it is given, so the same
//! column can infer differently for different filtered subsets.

use serde::Serialize;
use serde_json::Value;

use super::summary::Summary;
use super::value::{AggregateKind, StatValue};
use crate::columns::{ColumnModel, DataKind};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::record::{field, looks_like_date, parse_number, Record};

/// One labelled statistic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatEntry {
    pub label: &'static str,
    pub kind: AggregateKind,
    pub value: StatValue,
}

/// Full description of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescription {
    /// Column id
    pub column: String,
    /// Effective type the statistics were computed under
    #[serde(rename = "type")]
    pub kind: DataKind,
    /// Statistics in display order
    pub results: Vec<StatEntry>,
}

impl ColumnDescription {
    /// Looks up a statistic by its label, e.g. `"Average"`
    pub fn get(&self, label: &str) -> Option<&StatValue> {
        self.results
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| &entry.value)
    }

    /// Looks up a statistic by aggregate kind
    pub fn value(&self, kind: AggregateKind) -> Option<&StatValue> {
        self.results
            .iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| &entry.value)
    }
}

/// Computes column statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsEngine<'a> {
    columns: Option<&'a ColumnModel>,
}

impl<'a> StatisticsEngine<'a> {
    /// Create an engine whose declared column types override inference
    pub fn new(columns: &'a ColumnModel) -> Self {
        Self {
            columns: Some(columns),
        }
    }

    /// Create an engine that infers every type from values
    pub fn untyped() -> Self {
        Self { columns: None }
    }

    /// Infers the effective type of a column.
    ///
    /// A declared numeric or date flag wins. Otherwise the column is numeric
    /// if every non-empty value parses as a number, date if more than half of
    /// the non-empty values look like dates, and text in every other case,
    /// including when there are no non-empty values.
    pub fn infer_type(&self, column_id: &str, values: &[&Value]) -> DataKind {
        if let Some(kind) = self.columns.and_then(|model| model.declared_kind(column_id)) {
            return kind;
        }
        infer_from_values(values)
    }

    /// Full description of a column over `records`
    pub fn describe<'r, I>(&self, column_id: &str, records: I) -> ColumnDescription
    where
        I: IntoIterator<Item = &'r Record>,
    {
        let values = column_values(records, column_id);
        let kind = self.infer_type(column_id, &values);
        let summary = Summary::compute(kind, &values);

        log_stats(column_id, kind, "describe", values.len());

        ColumnDescription {
            column: column_id.to_string(),
            kind,
            results: summary
                .entries()
                .into_iter()
                .map(|(kind, value)| StatEntry {
                    label: kind.label(),
                    kind,
                    value,
                })
                .collect(),
        }
    }

    /// One named aggregate of a column over `records`.
    ///
    /// Returns `StatValue::NotApplicable` when the aggregate does not apply to
    /// the column's effective type.
    pub fn compute_single<'r, I>(
        &self,
        column_id: &str,
        records: I,
        aggregate: AggregateKind,
    ) -> StatValue
    where
        I: IntoIterator<Item = &'r Record>,
    {
        let values = column_values(records, column_id);
        let kind = self.infer_type(column_id, &values);

        log_stats(column_id, kind, aggregate.as_str(), values.len());

        if !aggregate.applies_to(kind) {
            return StatValue::NotApplicable;
        }
        Summary::compute(kind, &values).value(aggregate)
    }
}

/// Present (non-absent) values of a column, in record order
pub fn column_values<'r, I>(records: I, column_id: &str) -> Vec<&'r Value>
where
    I: IntoIterator<Item = &'r Record>,
{
    records
        .into_iter()
        .filter_map(|record| field(record, column_id))
        .collect()
}

fn infer_from_values(values: &[&Value]) -> DataKind {
    if values.is_empty() {
        return DataKind::Text;
    }

    if values.iter().all(|v| parse_number(v).is_some()) {
        return DataKind::Numeric;
    }

    let dates = values.iter().filter(|v| looks_like_date(v)).count();
    if dates * 2 > values.len() {
        DataKind::Date
    } else {
        DataKind::Text
    }
}

fn log_stats(column_id: &str, kind: DataKind, what: &str, count: usize) {
    if Logger::enabled(Severity::Trace) {
        let count = count.to_string();
        log_event_with_fields(
            Event::StatsComputed,
            &[
                ("aggregate", what),
                ("column", column_id),
                ("type", kind.as_str()),
                ("values", count.as_str()),
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::Column;
    use crate::record::from_value;
    use serde_json::json;

    fn records(values: Vec<Value>) -> Vec<Record> {
        values.into_iter().filter_map(from_value).collect()
    }

    #[test]
    fn test_infer_numeric() {
        let values = [json!(1), json!("$2,000"), json!("3.5")];
        let refs: Vec<&Value> = values.iter().collect();
        assert_eq!(StatisticsEngine::untyped().infer_type("x", &refs), DataKind::Numeric);
    }

    #[test]
    fn test_infer_date_majority() {
        let values = [json!("2023-01-01"), json!("2023-02-01"), json!("unknown")];
        let refs: Vec<&Value> = values.iter().collect();
        assert_eq!(StatisticsEngine::untyped().infer_type("x", &refs), DataKind::Date);
    }

    #[test]
    fn test_infer_date_needs_strict_majority() {
        let values = [json!("2023-01-01"), json!("unknown")];
        let refs: Vec<&Value> = values.iter().collect();
        assert_eq!(StatisticsEngine::untyped().infer_type("x", &refs), DataKind::Text);
    }

    #[test]
    fn test_infer_empty_is_text() {
        assert_eq!(StatisticsEngine::untyped().infer_type("x", &[]), DataKind::Text);
    }

    #[test]
    fn test_declared_type_wins() {
        let model = ColumnModel::new(vec![Column::new("code", "Code", "").numeric()]).unwrap();
        let values = [json!("A-1"), json!("B-2")];
        let refs: Vec<&Value> = values.iter().collect();
        assert_eq!(StatisticsEngine::new(&model).infer_type("code", &refs), DataKind::Numeric);
    }

    #[test]
    fn test_inference_depends_on_subset() {
        let rows = records(vec![
            json!({"v": "10"}),
            json!({"v": "20"}),
            json!({"v": "pending"}),
        ]);
        let engine = StatisticsEngine::untyped();

        assert_eq!(engine.describe("v", &rows).kind, DataKind::Text);
        assert_eq!(engine.describe("v", &rows[..2]).kind, DataKind::Numeric);
    }

    #[test]
    fn test_describe_numeric() {
        let rows = records(vec![
            json!({"salary": 3000}),
            json!({"salary": 2000}),
            json!({"name": "no salary"}),
        ]);
        let description = StatisticsEngine::untyped().describe("salary", &rows);

        assert_eq!(description.kind, DataKind::Numeric);
        assert_eq!(description.get("Count"), Some(&StatValue::Count(2)));
        assert_eq!(description.get("Average"), Some(&StatValue::Number(2500.0)));
        assert_eq!(description.get("Median"), Some(&StatValue::Number(2500.0)));
        assert_eq!(description.get("Total"), Some(&StatValue::Number(5000.0)));
        assert_eq!(description.get("Minimum"), Some(&StatValue::Number(2000.0)));
        assert_eq!(description.get("Maximum"), Some(&StatValue::Number(3000.0)));
    }

    #[test]
    fn test_describe_text() {
        let rows = records(vec![
            json!({"dept": "Eng"}),
            json!({"dept": "Sales"}),
            json!({"dept": "Eng"}),
        ]);
        let description = StatisticsEngine::untyped().describe("dept", &rows);

        assert_eq!(description.kind, DataKind::Text);
        assert_eq!(description.get("Unique Values"), Some(&StatValue::Count(2)));
        assert_eq!(
            description.get("Most Common"),
            Some(&StatValue::Text("Eng".to_string()))
        );
        assert_eq!(description.get("Most Common Count"), Some(&StatValue::Count(2)));
    }

    #[test]
    fn test_compute_single_matches_describe() {
        let rows = records(vec![
            json!({"n": 1.5}),
            json!({"n": "2.25"}),
            json!({"n": 7}),
            json!({"n": 10}),
        ]);
        let engine = StatisticsEngine::untyped();
        let description = engine.describe("n", &rows);

        for kind in AggregateKind::applicable_to(DataKind::Numeric) {
            assert_eq!(
                Some(&engine.compute_single("n", &rows, *kind)),
                description.value(*kind),
                "aggregate {}",
                kind
            );
        }
    }

    #[test]
    fn test_compute_single_inapplicable() {
        let rows = records(vec![json!({"name": "Alice"})]);
        let value = StatisticsEngine::untyped().compute_single("name", &rows, AggregateKind::Average);
        assert_eq!(value, StatValue::NotApplicable);
    }

    #[test]
    fn test_describe_empty_records() {
        let rows: Vec<Record> = Vec::new();
        let description = StatisticsEngine::untyped().describe("x", &rows);
        assert_eq!(description.kind, DataKind::Text);
        assert_eq!(description.get("Count"), Some(&StatValue::Count(0)));
        assert_eq!(description.get("Most Common"), Some(&StatValue::NotApplicable));
    }
}
