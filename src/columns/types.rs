//! Column type definitions
//!
//! A column is a field's metadata: label, category, type hints and an
//! optional parent it depends on. Columns are defined once and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Effective data classification of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    /// Finite numbers, possibly written with currency symbols
    Numeric,
    /// Calendar dates or instants
    Date,
    /// Anything else
    Text,
}

impl DataKind {
    /// Returns the type name
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Numeric => "numeric",
            DataKind::Date => "date",
            DataKind::Text => "text",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of a column from its declared metadata alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// An explicit numeric or date flag decides the kind
    Declared(DataKind),
    /// No flag: the kind is inferred from values at statistics time
    Deferred,
}

impl Classification {
    /// Returns the declared kind, if any
    pub fn declared(&self) -> Option<DataKind> {
        match self {
            Classification::Declared(kind) => Some(*kind),
            Classification::Deferred => None,
        }
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Unique field id
    pub id: String,
    /// Human-readable header
    pub label: String,
    /// Grouping used by column pickers
    #[serde(default)]
    pub category: String,
    /// Declared numeric
    #[serde(default)]
    pub is_numeric: bool,
    /// Declared date
    #[serde(default)]
    pub is_date: bool,
    /// Has dependent columns
    #[serde(default)]
    pub is_parent: bool,
    /// Parent column id; only shown when the parent is shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dependent_of: Option<String>,
}

impl Column {
    /// Create a column with no type hints
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category: category.into(),
            is_numeric: false,
            is_date: false,
            is_parent: false,
            is_dependent_of: None,
        }
    }

    /// Mark as numeric
    pub fn numeric(mut self) -> Self {
        self.is_numeric = true;
        self
    }

    /// Mark as date
    pub fn date(mut self) -> Self {
        self.is_date = true;
        self
    }

    /// Mark as a parent of dependent columns
    pub fn parent(mut self) -> Self {
        self.is_parent = true;
        self
    }

    /// Make this column depend on `parent`
    pub fn dependent_of(mut self, parent: impl Into<String>) -> Self {
        self.is_dependent_of = Some(parent.into());
        self
    }

    /// Classification from flags. The numeric flag wins over the date flag.
    pub fn classification(&self) -> Classification {
        if self.is_numeric {
            Classification::Declared(DataKind::Numeric)
        } else if self.is_date {
            Classification::Declared(DataKind::Date)
        } else {
            Classification::Deferred
        }
    }

    /// Returns true if this column depends on another
    pub fn is_dependent(&self) -> bool {
        self.is_dependent_of.is_some()
    }
}
