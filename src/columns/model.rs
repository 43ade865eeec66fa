//! The column model: registry of column definitions
//!
//! Validated once at construction:
//! - ids are unique
//! - every `is_dependent_of` names an existing column
//! - no column is its own ancestor
//!
//! After construction the model is immutable and every lookup is total.

use std::collections::{HashMap, HashSet};

use super::errors::{ColumnError, ColumnResult};
use super::types::{Classification, Column, DataKind};
use crate::observability::{log_event_with_fields, Event};

/// Immutable registry of columns in definition order
#[derive(Debug, Clone, Default)]
pub struct ColumnModel {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
}

impl ColumnModel {
    /// Builds and validates a model from column definitions.
    pub fn new(columns: Vec<Column>) -> ColumnResult<Self> {
        let mut index = HashMap::with_capacity(columns.len());
        for (pos, column) in columns.iter().enumerate() {
            if index.insert(column.id.clone(), pos).is_some() {
                return Err(ColumnError::DuplicateId(column.id.clone()));
            }
        }

        let model = Self { columns, index };
        model.validate_dependencies()?;
        Ok(model)
    }

    fn validate_dependencies(&self) -> ColumnResult<()> {
        for column in &self.columns {
            let mut seen: HashSet<&str> = HashSet::new();
            seen.insert(column.id.as_str());

            let mut current = column;
            while let Some(parent_id) = current.is_dependent_of.as_deref() {
                let parent = self.get(parent_id).ok_or_else(|| ColumnError::UnknownParent {
                    column: current.id.clone(),
                    parent: parent_id.to_string(),
                })?;

                if !seen.insert(parent.id.as_str()) {
                    return Err(ColumnError::DependencyCycle(column.id.clone()));
                }
                current = parent;
            }
        }
        Ok(())
    }

    /// Looks up a column by id.
    pub fn get(&self, id: &str) -> Option<&Column> {
        self.index.get(id).map(|&pos| &self.columns[pos])
    }

    /// Resolves a column by id, failing with `NotFound` for unknown ids.
    pub fn resolve(&self, id: &str) -> ColumnResult<&Column> {
        self.get(id)
            .ok_or_else(|| ColumnError::NotFound(id.to_string()))
    }

    /// Classifies a column from its declared flags.
    ///
    /// Columns without a numeric or date flag are `Deferred`: their kind is
    /// inferred from values by the statistics engine.
    pub fn classify(&self, id: &str) -> ColumnResult<Classification> {
        self.resolve(id).map(Column::classification)
    }

    /// Declared kind of a column; unknown ids have none.
    pub fn declared_kind(&self, id: &str) -> Option<DataKind> {
        self.get(id)
            .and_then(|column| column.classification().declared())
    }

    /// All columns in definition order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the model has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns that directly depend on `id`, in definition order
    pub fn dependents_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Column> + 'a {
        self.columns
            .iter()
            .filter(move |column| column.is_dependent_of.as_deref() == Some(id))
    }

    /// Categories in first-definition order, each with its columns
    pub fn categories(&self) -> Vec<(&str, Vec<&Column>)> {
        let mut groups: Vec<(&str, Vec<&Column>)> = Vec::new();
        for column in &self.columns {
            match groups
                .iter_mut()
                .find(|(category, _)| *category == column.category)
            {
                Some((_, members)) => members.push(column),
                None => groups.push((column.category.as_str(), vec![column])),
            }
        }
        groups
    }

    /// Expands a selection into the ordered list of visible columns.
    ///
    /// Selected top-level columns appear in selection order. Each shown column
    /// is immediately followed by its selected dependents (depth-first), so a
    /// dependent is shown only when it and every ancestor are selected. Each
    /// column appears at most once; unknown ids are skipped.
    pub fn expand_visible<S: AsRef<str>>(&self, selection: &[S]) -> Vec<&Column> {
        let mut selected: Vec<&Column> = Vec::with_capacity(selection.len());
        for id in selection {
            let id = id.as_ref();
            match self.get(id) {
                Some(column) => selected.push(column),
                None => log_event_with_fields(Event::ColumnNotFound, &[("column", id)]),
            }
        }

        let mut visible = Vec::with_capacity(selected.len());
        let mut visited: HashSet<&str> = HashSet::new();

        for root in selected.iter().filter(|column| !column.is_dependent()) {
            let mut worklist = vec![*root];

            while let Some(current) = worklist.pop() {
                if !visited.insert(current.id.as_str()) {
                    continue;
                }
                visible.push(current);

                // Reverse so the first selected dependent is shown first.
                worklist.extend(
                    selected
                        .iter()
                        .rev()
                        .filter(|c| c.is_dependent_of.as_deref() == Some(current.id.as_str()))
                        .copied(),
                );
            }
        }

        visible
    }
}
