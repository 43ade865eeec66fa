//! Predicate engine for tabledeck
//!
//! Evaluates filter rules against records. A rule list is a conjunction;
//! there is no OR or grouping.
//!
//! # Evaluation Flow
//!
//! 1. Wire rules (`RuleSpec`) are compiled into typed `FilterRule`s
//! 2. Unknown operators follow the configured `UnknownOperatorPolicy`
//! 3. Arity mismatches are reported but kept; they evaluate fail-closed
//! 4. `PredicateFilter::apply_all` keeps records passing every rule, in order
//!
//! # Invariants
//!
//! - Malformed values make a predicate false, never an error
//! - An empty rule list is the identity
//! - Filtering is idempotent

mod errors;
mod evaluator;
mod rule;

pub use errors::{FilterError, FilterResult};
pub use evaluator::PredicateFilter;
pub use rule::{
    Arity, FilterDiagnostic, FilterOperator, FilterRule, FilterSet, RuleSpec,
    UnknownOperatorPolicy,
};
