//! Session-scoped cache of computed aggregates
//!
//! Entries are keyed by column id. Each entry is valid only for the snapshot
//! fingerprint it was computed under; a new fingerprint drops every entry.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::value::{AggregateKind, StatValue};

/// One aggregate computed for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedAggregate {
    pub field: String,
    pub value: StatValue,
    #[serde(rename = "aggregateKind")]
    pub kind: AggregateKind,
}

/// SHA-256 digest of the inputs a set of aggregates was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Aggregates keyed by column id
#[derive(Debug, Clone, Default)]
pub struct AggregateCache {
    entries: BTreeMap<String, ComputedAggregate>,
    fingerprint: Option<Fingerprint>,
}

impl AggregateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the cache to a snapshot fingerprint.
    ///
    /// Returns true if the fingerprint changed and entries were dropped.
    pub fn validate(&mut self, fingerprint: Fingerprint) -> bool {
        if self.fingerprint == Some(fingerprint) {
            return false;
        }
        self.fingerprint = Some(fingerprint);
        let had_entries = !self.entries.is_empty();
        self.entries.clear();
        had_entries
    }

    /// Cached aggregate for `field`, only if it was computed for `kind`
    pub fn lookup(&self, field: &str, kind: AggregateKind) -> Option<&ComputedAggregate> {
        self.entries.get(field).filter(|entry| entry.kind == kind)
    }

    pub fn get(&self, field: &str) -> Option<&ComputedAggregate> {
        self.entries.get(field)
    }

    /// Stores an aggregate, replacing any previous one for the same field
    pub fn insert(&mut self, aggregate: ComputedAggregate) {
        self.entries.insert(aggregate.field.clone(), aggregate);
    }

    pub fn remove(&mut self, field: &str) -> Option<ComputedAggregate> {
        self.entries.remove(field)
    }

    /// Drops every entry and forgets the fingerprint
    pub fn clear(&mut self) {
        self.entries.clear();
        self.fingerprint = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComputedAggregate> {
        self.entries.values()
    }
}
