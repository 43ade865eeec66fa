//! Export error types
//!
//! Error codes:
//! - TABLEDECK_EXPORT_WRITE
//! - TABLEDECK_EXPORT_ENCODING

use thiserror::Error;

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write delimited output: {0}")]
    Write(#[from] csv::Error),

    #[error("Failed to flush delimited output: {0}")]
    Flush(String),

    #[error("Delimited output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl ExportError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ExportError::Write(_) | ExportError::Flush(_) => "TABLEDECK_EXPORT_WRITE",
            ExportError::Encoding(_) => "TABLEDECK_EXPORT_ENCODING",
        }
    }
}
