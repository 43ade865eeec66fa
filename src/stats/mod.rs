//! Statistics engine for tabledeck
//!
//! Infers a column's effective type and computes descriptive statistics or a
//! single named aggregate over the currently visible records.
//!
//! # Invariants
//!
//! - Malformed values are excluded from an aggregate's input, never fatal
//! - `compute_single` equals the matching field of `describe` for equal inputs
//! - Inapplicable aggregates yield `StatValue::NotApplicable`

mod cache;
mod engine;
mod summary;
mod value;

pub use cache::{AggregateCache, ComputedAggregate, Fingerprint};
pub use engine::{column_values, ColumnDescription, StatEntry, StatisticsEngine};
pub use summary::{DateSummary, NumericSummary, Summary, TextSummary};
pub use value::{AggregateKind, StatValue, NOT_AVAILABLE};
