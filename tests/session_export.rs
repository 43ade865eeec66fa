//! Session and Export Tests
//!
//! Tests for the caller-facing surface:
//! - Footer aggregates are cached per snapshot
//! - The cache is dropped when records, rules or sort keys change
//! - Sort toggling cycles through ascending, descending, unsorted
//! - Exported text matches the rendered view
//! - Configuration and column files load from disk

use std::fs;

use serde_json::{json, Value};
use tabledeck::columns::{Column, ColumnLoader, ColumnModel};
use tabledeck::config::EngineConfig;
use tabledeck::export::TableExport;
use tabledeck::filter::{RuleSpec, UnknownOperatorPolicy};
use tabledeck::record::{from_value, Record};
use tabledeck::session::TableSession;
use tabledeck::sort::{SortDirection, SortKey};
use tabledeck::stats::{AggregateKind, StatValue};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn model() -> ColumnModel {
    ColumnModel::new(vec![
        Column::new("name", "Name", "People"),
        Column::new("dept", "Department", "People"),
        Column::new("salary", "Salary", "Pay").numeric(),
        Column::new("hired", "Hired", "Dates").date(),
    ])
    .unwrap()
}

fn records(values: Value) -> Vec<Record> {
    values
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter_map(from_value)
        .collect()
}

fn staff() -> Vec<Record> {
    records(json!([
        {"name": "Alice", "dept": "Eng", "salary": 1000, "hired": "2023-01-01"},
        {"name": "Bob", "dept": "Sales", "salary": 3000, "hired": "2023-06-01"},
        {"name": "Carol", "dept": "Eng", "salary": 2000, "hired": "2022-12-01"}
    ]))
}

fn spec(id: &str, field: &str, operator: &str, values: Vec<Value>) -> RuleSpec {
    RuleSpec {
        id: id.to_string(),
        field: field.to_string(),
        operator: operator.to_string(),
        values,
    }
}

fn salary_session(model: &ColumnModel) -> TableSession<'_> {
    let mut session = TableSession::new(model);
    session.set_selection(vec!["name".into(), "salary".into()]);
    session
        .select_aggregate("salary", AggregateKind::Average)
        .unwrap();
    session
}

fn footer_text(session: &mut TableSession<'_>, data: &[Record]) -> String {
    let view = session.render(data);
    let index = view.column_index("salary").unwrap();
    view.footer[index].as_ref().unwrap().text.clone()
}

// =============================================================================
// Aggregate Cache
// =============================================================================

#[test]
fn test_unchanged_snapshot_hits_cache() {
    let model = model();
    let mut session = salary_session(&model);
    let data = staff();

    assert_eq!(footer_text(&mut session, &data), "2000");
    assert_eq!(footer_text(&mut session, &data), "2000");
    assert_eq!(footer_text(&mut session, &data), "2000");

    let metrics = session.metrics().snapshot();
    assert_eq!(metrics.cache_hits, 2);
    assert_eq!(metrics.cache_invalidations, 0);
}

#[test]
fn test_record_change_invalidates_cache() {
    let model = model();
    let mut session = salary_session(&model);

    assert_eq!(footer_text(&mut session, &staff()), "2000");

    let mut changed = staff();
    changed[1].insert("salary".into(), json!(6000));
    assert_eq!(footer_text(&mut session, &changed), "3000");

    let metrics = session.metrics().snapshot();
    assert_eq!(metrics.cache_invalidations, 1);
    assert_eq!(metrics.cache_hits, 0);
}

#[test]
fn test_rule_change_invalidates_cache() {
    let model = model();
    let mut session = salary_session(&model);
    let data = staff();

    assert_eq!(footer_text(&mut session, &data), "2000");

    session
        .set_rules(&[spec("r1", "dept", "is", vec![json!("eng")])])
        .unwrap();
    assert_eq!(footer_text(&mut session, &data), "1500");
    assert_eq!(session.metrics().snapshot().cache_invalidations, 1);
}

#[test]
fn test_rule_id_change_keeps_cache() {
    let model = model();
    let mut session = salary_session(&model);
    let data = staff();

    session
        .set_rules(&[spec("r1", "dept", "is", vec![json!("eng")])])
        .unwrap();
    footer_text(&mut session, &data);

    session
        .set_rules(&[spec("renamed", "dept", "is", vec![json!("eng")])])
        .unwrap();
    assert_eq!(footer_text(&mut session, &data), "1500");

    let metrics = session.metrics().snapshot();
    assert_eq!(metrics.cache_invalidations, 0);
    assert_eq!(metrics.cache_hits, 1);
}

#[test]
fn test_sort_change_invalidates_cache() {
    let model = model();
    let mut session = salary_session(&model);
    let data = staff();

    footer_text(&mut session, &data);
    session.toggle_sort("salary");
    assert_eq!(footer_text(&mut session, &data), "2000");

    let metrics = session.metrics().snapshot();
    assert_eq!(metrics.cache_invalidations, 1);
    assert_eq!(metrics.cache_hits, 0);
}

#[test]
fn test_changing_aggregate_recomputes_column() {
    let model = model();
    let mut session = salary_session(&model);
    let data = staff();

    assert_eq!(footer_text(&mut session, &data), "2000");

    session
        .select_aggregate("salary", AggregateKind::Maximum)
        .unwrap();
    assert_eq!(footer_text(&mut session, &data), "3000");
    assert_eq!(session.aggregate_for("salary"), Some(AggregateKind::Maximum));
    assert_eq!(session.cache().len(), 1);
}

#[test]
fn test_unknown_column_aggregate_rejected() {
    let model = model();
    let mut session = TableSession::new(&model);

    let err = session
        .select_aggregate("bonus", AggregateKind::Total)
        .unwrap_err();
    assert_eq!(err.code(), "TABLEDECK_COLUMN_NOT_FOUND");
    assert_eq!(session.aggregate_for("bonus"), None);
}

// =============================================================================
// Session State
// =============================================================================

#[test]
fn test_toggle_sort_cycle() {
    let model = model();
    let mut session = TableSession::new(&model);
    session.set_selection(vec!["name".into()]);
    let data = staff();

    session.toggle_sort("salary");
    assert_eq!(session.sort_keys()[0].direction, SortDirection::Ascending);
    let names: Vec<String> = session.render(&data).rows.into_iter().map(|r| r[0].clone()).collect();
    assert_eq!(names, vec!["Alice", "Carol", "Bob"]);

    session.toggle_sort("salary");
    assert_eq!(session.sort_keys()[0].direction, SortDirection::Descending);
    let names: Vec<String> = session.render(&data).rows.into_iter().map(|r| r[0].clone()).collect();
    assert_eq!(names, vec!["Bob", "Carol", "Alice"]);

    session.toggle_sort("salary");
    assert!(session.sort_keys().is_empty());
    let names: Vec<String> = session.render(&data).rows.into_iter().map(|r| r[0].clone()).collect();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
}

#[test]
fn test_reset_keeps_selection() {
    let model = model();
    let mut session = salary_session(&model);
    session
        .set_rules(&[spec("r1", "dept", "is", vec![json!("eng")])])
        .unwrap();
    session.set_sort_keys(vec![SortKey::desc("salary")]);
    session.render(&staff());

    session.reset();

    assert!(session.rules().is_empty());
    assert!(session.sort_keys().is_empty());
    assert_eq!(session.aggregate_for("salary"), None);
    assert!(session.cache().is_empty());
    assert_eq!(session.selection(), &["name".to_string(), "salary".to_string()]);

    let view = session.render(&staff());
    assert_eq!(view.row_count(), 3);
    assert!(!view.has_footer());
}

#[test]
fn test_unknown_operator_reported_through_session() {
    let model = model();
    let mut session = TableSession::new(&model);

    let diagnostics = session
        .set_rules(&[
            spec("keep", "dept", "is", vec![json!("sales")]),
            spec("odd", "name", "rhymes_with", vec![json!("Bob")]),
        ])
        .unwrap()
        .to_vec();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].rule_id, "odd");
    assert_eq!(session.rules().len(), 1);
    assert_eq!(session.rows(&staff()).len(), 1);
}

#[test]
fn test_describe_and_compute_agree() {
    let model = model();
    let mut session = TableSession::new(&model);
    session
        .set_rules(&[spec("r1", "dept", "is", vec![json!("eng")])])
        .unwrap();
    let data = staff();

    let description = session.describe(&data, "hired").unwrap();
    let earliest = session
        .compute(&data, "hired", AggregateKind::Earliest)
        .unwrap();

    assert_eq!(description.value(AggregateKind::Earliest), Some(&earliest));
    assert_eq!(earliest.to_string(), "2022-12-01");

    let median = session
        .compute(&data, "hired", AggregateKind::Median)
        .unwrap();
    assert_eq!(median, StatValue::NotApplicable);
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_export_matches_rendered_view() {
    let model = model();
    let mut session = salary_session(&model);
    session.set_sort_keys(vec![SortKey::desc("salary")]);

    let view = session.render(&staff());
    let text = TableExport::from_view(&view, true).to_delimited(b',').unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Name,Salary");
    for (line, row) in lines[1..=view.row_count()].iter().zip(&view.rows) {
        assert_eq!(*line, row.join(","));
    }
    assert_eq!(lines.last(), Some(&",Average: 2000"));
    assert_eq!(lines.len(), view.row_count() + 2);
}

#[test]
fn test_export_without_footer_and_custom_delimiter() {
    let model = model();
    let mut session = salary_session(&model);
    session
        .set_rules(&[spec("r1", "salary", "greater_than", vec![json!(1500)])])
        .unwrap();

    let view = session.render(&staff());
    let text = TableExport::from_view(&view, false).to_delimited(b';').unwrap();

    assert_eq!(text, "Name;Salary\nBob;3000\nCarol;2000\n");
}

// =============================================================================
// Configuration Files
// =============================================================================

#[test]
fn test_config_and_columns_from_disk() {
    let dir = TempDir::new().unwrap();
    let columns_path = dir.path().join("columns.json");
    fs::write(
        &columns_path,
        r#"[
            {"id": "name", "label": "Name", "category": "People"},
            {"id": "salary", "label": "Salary", "category": "Pay", "isNumeric": true}
        ]"#,
    )
    .unwrap();

    let config_path = dir.path().join("tabledeck.json");
    let config_json = json!({
        "columns_path": columns_path,
        "unknown_operator_policy": "reject",
        "export_delimiter": "|",
        "not_available": "-"
    });
    fs::write(&config_path, config_json.to_string()).unwrap();

    let config = EngineConfig::load(&config_path).unwrap();
    assert_eq!(config.unknown_operator_policy, UnknownOperatorPolicy::Reject);
    assert_eq!(config.delimiter_byte(), b'|');

    let model = ColumnLoader::load_file(config.columns_path.as_deref().unwrap()).unwrap();
    let mut session = TableSession::with_config(&model, &config);
    session.set_selection(vec!["name".into(), "salary".into()]);
    session.select_aggregate("name", AggregateKind::Average).unwrap();

    let err = session
        .set_rules(&[spec("odd", "name", "rhymes_with", vec![json!("x")])])
        .unwrap_err();
    assert_eq!(err.code(), "TABLEDECK_UNKNOWN_OPERATOR");

    let view = session.render(&staff());
    let text = TableExport::from_view(&view, true)
        .to_delimited(config.delimiter_byte())
        .unwrap();
    assert!(text.starts_with("Name|Salary\n"));
    assert!(text.ends_with("Average: -|\n"));
}

#[test]
fn test_invalid_config_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"log_level": "loud"}"#).unwrap();

    let err = EngineConfig::load(&path).unwrap_err();
    assert_eq!(err.code(), "TABLEDECK_CONFIG_ERROR");
}

#[test]
fn test_dependent_columns_follow_parent() {
    let model = ColumnLoader::from_json_str(
        "inline",
        r#"[
            {"id": "firstName", "label": "First", "category": "Name", "isParent": true},
            {"id": "middleName", "label": "Middle", "category": "Name", "isDependentOf": "firstName"},
            {"id": "lastName", "label": "Last", "category": "Name"}
        ]"#,
    )
    .unwrap();
    let data = records(json!([
        {"firstName": "Ada", "middleName": "King", "lastName": "Lovelace"}
    ]));

    let mut session = TableSession::new(&model);
    session.set_selection(vec!["middleName".into(), "lastName".into()]);
    let view = session.render(&data);
    assert_eq!(view.rows, vec![vec!["Lovelace".to_string()]]);

    session.set_selection(vec!["middleName".into(), "firstName".into()]);
    let view = session.render(&data);
    let ids: Vec<&str> = view.columns.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["firstName", "middleName"]);
    assert_eq!(view.rows[0], vec!["Ada".to_string(), "King".to_string()]);
}
