//! Column model error types
//!
//! Error codes:
//! - TABLEDECK_COLUMN_NOT_FOUND
//! - TABLEDECK_DUPLICATE_COLUMN
//! - TABLEDECK_UNKNOWN_PARENT
//! - TABLEDECK_DEPENDENCY_CYCLE
//! - TABLEDECK_MALFORMED_COLUMNS

use thiserror::Error;

/// Result type for column model operations
pub type ColumnResult<T> = Result<T, ColumnError>;

/// Column model errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    #[error("Column not found: {0}")]
    NotFound(String),

    #[error("Duplicate column id: {0}")]
    DuplicateId(String),

    #[error("Column '{column}' depends on unknown column '{parent}'")]
    UnknownParent { column: String, parent: String },

    #[error("Column '{0}' is its own ancestor")]
    DependencyCycle(String),

    #[error("Malformed column definitions in {source_name}: {reason}")]
    Malformed { source_name: String, reason: String },
}

impl ColumnError {
    /// Create a malformed-definitions error
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        ColumnError::Malformed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ColumnError::NotFound(_) => "TABLEDECK_COLUMN_NOT_FOUND",
            ColumnError::DuplicateId(_) => "TABLEDECK_DUPLICATE_COLUMN",
            ColumnError::UnknownParent { .. } => "TABLEDECK_UNKNOWN_PARENT",
            ColumnError::DependencyCycle(_) => "TABLEDECK_DEPENDENCY_CYCLE",
            ColumnError::Malformed { .. } => "TABLEDECK_MALFORMED_COLUMNS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ColumnError::NotFound("x".into()).code(),
            "TABLEDECK_COLUMN_NOT_FOUND"
        );
        assert_eq!(
            ColumnError::DependencyCycle("x".into()).code(),
            "TABLEDECK_DEPENDENCY_CYCLE"
        );
    }

    #[test]
    fn test_error_display() {
        let err = ColumnError::UnknownParent {
            column: "middleName".into(),
            parent: "firstName".into(),
        };
        let display = err.to_string();
        assert!(display.contains("middleName"));
        assert!(display.contains("firstName"));
    }
}
