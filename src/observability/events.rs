//! Observability events for tabledeck
//!
//! Events are explicit and typed; each carries its own default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in tabledeck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Engine configuration loaded
    ConfigLoaded,
    /// Column definitions loaded
    ColumnsLoaded,

    // Column model
    /// A selection or lookup named an unknown column
    ColumnNotFound,

    // Filtering
    /// A rule set was applied to a record set
    FilterApplied,
    /// A rule named an operator outside the catalog
    UnknownOperator,
    /// A rule's value count does not fit its operator
    RuleArityMismatch,

    // Sorting
    /// A record set was ordered by sort keys
    SortApplied,

    // Statistics
    /// Column statistics computed
    StatsComputed,
    /// Cached aggregates dropped because the snapshot changed
    AggregateCacheInvalidated,

    // Export
    /// A table view was serialized
    ExportComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ColumnsLoaded => "COLUMNS_LOADED",
            Event::ColumnNotFound => "COLUMN_NOT_FOUND",
            Event::FilterApplied => "FILTER_APPLIED",
            Event::UnknownOperator => "UNKNOWN_OPERATOR",
            Event::RuleArityMismatch => "RULE_ARITY_MISMATCH",
            Event::SortApplied => "SORT_APPLIED",
            Event::StatsComputed => "STATS_COMPUTED",
            Event::AggregateCacheInvalidated => "AGGREGATE_CACHE_INVALIDATED",
            Event::ExportComplete => "EXPORT_COMPLETE",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ColumnNotFound | Event::UnknownOperator | Event::RuleArityMismatch => {
                Severity::Warn
            }
            Event::ConfigLoaded | Event::ColumnsLoaded | Event::ExportComplete => Severity::Info,
            Event::FilterApplied
            | Event::SortApplied
            | Event::StatsComputed
            | Event::AggregateCacheInvalidated => Severity::Trace,
        }
    }

    /// Returns true if the event is a diagnostic surfaced to callers
    pub fn is_diagnostic(&self) -> bool {
        self.severity() >= Severity::Warn
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
