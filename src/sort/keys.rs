//! Sort keys and the key list

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One (field, direction) ordering instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    /// Column id to sort by
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Ordered list of sort keys; the first key is primary.
///
/// Holds at most one key per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SortKey>", into = "Vec<SortKey>")]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a key list, keeping only the first key given for each field.
    pub fn from_keys(keys: Vec<SortKey>) -> Self {
        let mut spec = Self::new();
        for key in keys {
            if spec.position(&key.field).is_none() {
                spec.keys.push(key);
            }
        }
        spec
    }

    /// Advances the field through not sorted, ascending, descending, removed.
    ///
    /// A field already in the list changes in place and keeps its precedence.
    pub fn toggle(&mut self, field: &str) {
        match self.position(field) {
            None => self.keys.push(SortKey::asc(field)),
            Some(index) => match self.keys[index].direction {
                SortDirection::Ascending => self.keys[index].direction = SortDirection::Descending,
                SortDirection::Descending => {
                    self.keys.remove(index);
                }
            },
        }
    }

    /// Direction of `field`, if it is a key
    pub fn direction_of(&self, field: &str) -> Option<SortDirection> {
        self.position(field).map(|index| self.keys[index].direction)
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.keys.iter().position(|key| key.field == field)
    }
}

impl From<Vec<SortKey>> for SortSpec {
    fn from(keys: Vec<SortKey>) -> Self {
        Self::from_keys(keys)
    }
}

impl From<SortSpec> for Vec<SortKey> {
    fn from(spec: SortSpec) -> Self {
        spec.keys
    }
}
