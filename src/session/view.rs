//! Rendered table snapshot
//!
//! A `TableView` is exactly what a renderer shows: header labels, display
//! text for every cell, and one optional footer aggregate per column. The
//! exporter serializes the same view, so both consumers agree byte for byte.

use serde::Serialize;
use serde_json::Value;

use crate::columns::Column;
use crate::record::{display_text, is_absent};
use crate::stats::{AggregateKind, StatValue};

/// Display text of one cell; absent values render as empty text
pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        Some(v) if !is_absent(value) => display_text(v),
        _ => String::new(),
    }
}

/// Header of one visible column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewColumn {
    pub id: String,
    pub label: String,
    pub category: String,
}

impl From<&Column> for ViewColumn {
    fn from(column: &Column) -> Self {
        Self {
            id: column.id.clone(),
            label: column.label.clone(),
            category: column.category.clone(),
        }
    }
}

/// Aggregate shown under one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FooterCell {
    pub kind: AggregateKind,
    pub value: StatValue,
    /// Display text of `value`
    pub text: String,
}

impl FooterCell {
    /// `"<Label>: <value>"`, as printed in footers
    pub fn caption(&self) -> String {
        format!("{}: {}", self.kind.label(), self.text)
    }
}

/// Filtered, sorted, formatted table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableView {
    pub columns: Vec<ViewColumn>,
    pub rows: Vec<Vec<String>>,
    /// One slot per column; `None` where no aggregate is selected
    pub footer: Vec<Option<FooterCell>>,
}

impl TableView {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if any column carries a footer aggregate
    pub fn has_footer(&self) -> bool {
        self.footer.iter().any(Option::is_some)
    }

    /// Position of a column in the view
    pub fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.id == id)
    }
}
