//! Observability subsystem for tabledeck
//!
//! Provides:
//! - Structured logging (JSON lines on stderr)
//! - Typed events with default severities
//! - Session-scoped counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on engine results
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use tabledeck::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::UnknownOperator, &[("operator", "fuzzy")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_sorts();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log an event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event at its default severity with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // This just verifies no panic
        log_event(Event::ConfigLoaded);
        log_event(Event::SortApplied);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::ColumnNotFound, &[("column", "bonus")]);
    }
}
