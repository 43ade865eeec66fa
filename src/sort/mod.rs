//! Sort engine for tabledeck
//!
//! Orders a record set by an ordered list of (field, direction) keys.
//!
//! # Invariants
//!
//! - Stable: records tied on every key keep their relative input order
//! - Absent values sort last under either direction
//! - An empty key list is the identity
//! - A key list holds at most one key per field

mod keys;
mod sorter;

pub use keys::{SortDirection, SortKey, SortSpec};
pub use sorter::{compare, ResultSorter};
