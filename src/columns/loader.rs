//! Column definition loader
//!
//! Column definitions live in a JSON file holding an array of column
//! objects. They are read once at process start; malformed files fail
//! loudly rather than yielding a partial model.

use std::fs;
use std::path::Path;

use super::errors::{ColumnError, ColumnResult};
use super::model::ColumnModel;
use super::types::Column;
use crate::observability::{log_event_with_fields, Event};

/// Loads column models from JSON
pub struct ColumnLoader;

impl ColumnLoader {
    /// Loads and validates a column model from a JSON file.
    pub fn load_file(path: &Path) -> ColumnResult<ColumnModel> {
        let content = fs::read_to_string(path).map_err(|e| {
            ColumnError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let model = Self::from_json_str(&path.display().to_string(), &content)?;

        let count = model.len().to_string();
        let path_str = path.display().to_string();
        log_event_with_fields(
            Event::ColumnsLoaded,
            &[("columns", count.as_str()), ("path", path_str.as_str())],
        );

        Ok(model)
    }

    /// Parses and validates a column model from JSON text.
    ///
    /// `source_name` is only used in error messages.
    pub fn from_json_str(source_name: &str, content: &str) -> ColumnResult<ColumnModel> {
        let columns: Vec<Column> = serde_json::from_str(content)
            .map_err(|e| ColumnError::malformed(source_name, format!("Invalid JSON: {}", e)))?;

        if let Some(column) = columns.iter().find(|c| c.id.trim().is_empty()) {
            return Err(ColumnError::malformed(
                source_name,
                format!("Column with label '{}' has an empty id", column.label),
            ));
        }

        ColumnModel::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DEFINITIONS: &str = r#"[
        {"id": "firstName", "label": "First Name", "category": "Name", "isParent": true},
        {"id": "middleName", "label": "Middle Name", "category": "Name", "isDependentOf": "firstName"},
        {"id": "salary", "label": "Salary", "category": "Pay", "isNumeric": true}
    ]"#;

    #[test]
    fn test_load_from_str() {
        let model = ColumnLoader::from_json_str("inline", DEFINITIONS).unwrap();
        assert_eq!(model.len(), 3);
        assert!(model.get("salary").unwrap().is_numeric);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DEFINITIONS.as_bytes()).unwrap();

        let model = ColumnLoader::load_file(file.path()).unwrap();
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn test_missing_file_is_malformed() {
        let err = ColumnLoader::load_file(Path::new("/nonexistent/columns.json")).unwrap_err();
        assert_eq!(err.code(), "TABLEDECK_MALFORMED_COLUMNS");
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = ColumnLoader::from_json_str("inline", "{not json").unwrap_err();
        assert_eq!(err.code(), "TABLEDECK_MALFORMED_COLUMNS");
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = ColumnLoader::from_json_str("inline", r#"[{"id": " ", "label": "Blank"}]"#)
            .unwrap_err();
        assert!(err.to_string().contains("Blank"));
    }

    #[test]
    fn test_validation_runs_on_load() {
        let err = ColumnLoader::from_json_str(
            "inline",
            r#"[{"id": "a", "label": "A", "isDependentOf": "missing"}]"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), "TABLEDECK_UNKNOWN_PARENT");
    }
}
