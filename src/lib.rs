//! tabledeck - A deterministic, in-memory tabular query engine
//!
//! Evaluates compound filter predicates over JSON records, performs stable
//! multi-key sorting, resolves column visibility with parent/dependent
//! relationships and computes per-column descriptive statistics.
//!
//! # Pipeline
//!
//! 1. Resolve the visible columns from a selection (`columns`)
//! 2. Keep records passing every filter rule (`filter`)
//! 3. Order the survivors by the sort keys (`sort`)
//! 4. Summarize visible columns over the ordered rows (`stats`)
//!
//! Every engine operation is a pure function of its inputs. The only mutable
//! state is the caller-owned [`session::TableSession`].

pub mod cli;
pub mod columns;
pub mod config;
pub mod export;
pub mod filter;
pub mod observability;
pub mod record;
pub mod session;
pub mod sort;
pub mod stats;
