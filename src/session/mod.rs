//! Table sessions for tabledeck
//!
//! The engine holds no ambient state. Whatever a consumer considers
//! "current" (selection, rules, sort keys, chosen aggregates) lives in a
//! `TableSession` it owns, and records are passed in on every call.
//!
//! # Pipeline
//!
//! 1. Filter by the current rules
//! 2. Sort by the current keys
//! 3. Format visible columns
//! 4. Fill footer aggregates from the cache, recomputing when stale
//!
//! # Cache Contract
//!
//! The aggregate cache is fingerprinted by records, rules and sort keys.
//! Any change drops every cached value before the next footer is built.

mod errors;
mod fingerprint;
mod table;
mod view;

pub use errors::{SessionError, SessionResult};
pub use fingerprint::snapshot_fingerprint;
pub use table::TableSession;
pub use view::{format_cell, FooterCell, TableView, ViewColumn};
