//! Delimited-text export

use serde::Serialize;

use super::errors::{ExportError, ExportResult};
use crate::observability::{log_event_with_fields, Event};
use crate::session::TableView;

/// Headers, rows and optional footer ready to serialize
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableExport {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub footer: Option<Vec<String>>,
}

impl TableExport {
    /// Builds an export from a rendered view.
    ///
    /// With `include_footer`, a footer row is added when any column carries an
    /// aggregate; each cell holds `"<Label>: <value>"` or is empty.
    pub fn from_view(view: &TableView, include_footer: bool) -> Self {
        let footer = (include_footer && view.has_footer()).then(|| {
            view.footer
                .iter()
                .map(|cell| cell.as_ref().map(|c| c.caption()).unwrap_or_default())
                .collect()
        });

        Self {
            headers: view.columns.iter().map(|c| c.label.clone()).collect(),
            rows: view.rows.clone(),
            footer,
        }
    }

    /// Serializes as delimited text with a header line
    pub fn to_delimited(&self, delimiter: u8) -> ExportResult<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(false)
            .from_writer(Vec::new());

        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        if let Some(footer) = &self.footer {
            writer.write_record(footer)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::Flush(e.to_string()))?;
        let text = String::from_utf8(bytes)?;

        let rows = self.rows.len().to_string();
        let footer = self.footer.is_some().to_string();
        log_event_with_fields(
            Event::ExportComplete,
            &[("footer", footer.as_str()), ("rows", rows.as_str())],
        );

        Ok(text)
    }
}
