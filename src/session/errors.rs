//! Session error types
//!
//! A session only fails when it is handed something it cannot hold: a rule
//! list rejected under the `reject` policy, or an aggregate for a column that
//! does not exist.

use thiserror::Error;

use crate::columns::ColumnError;
use crate::filter::FilterError;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Session errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Column(#[from] ColumnError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl SessionError {
    /// Returns the stable error code of the underlying error
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::Column(err) => err.code(),
            SessionError::Filter(err) => err.code(),
        }
    }
}
