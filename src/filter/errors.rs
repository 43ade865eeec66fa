//! Filter error types
//!
//! Evaluation itself never fails: malformed values make a predicate false.
//! These errors only come from compiling or validating rules.
//!
//! Error codes:
//! - TABLEDECK_UNKNOWN_OPERATOR
//! - TABLEDECK_RULE_ARITY

use thiserror::Error;

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

/// Filter errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Unknown filter operator '{operator}' in rule '{rule_id}'")]
    UnknownOperator { rule_id: String, operator: String },

    #[error("Operator '{operator}' expects {expected} value(s), rule '{rule_id}' has {actual}")]
    Arity {
        rule_id: String,
        operator: &'static str,
        expected: &'static str,
        actual: usize,
    },
}

impl FilterError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::UnknownOperator { .. } => "TABLEDECK_UNKNOWN_OPERATOR",
            FilterError::Arity { .. } => "TABLEDECK_RULE_ARITY",
        }
    }
}
