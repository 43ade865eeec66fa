//! Table export for tabledeck
//!
//! Serializes a rendered `TableView`. Cell text is taken from the view as-is,
//! so exported rows match what the table renderer shows for the same snapshot.

mod delimited;
mod errors;

pub use delimited::TableExport;
pub use errors::{ExportError, ExportResult};
