//! Column model subsystem for tabledeck
//!
//! Defines the universe of fields, their type classification, category
//! grouping and parent/dependent relationships.
//!
//! # Invariants
//!
//! - Column ids are unique
//! - A dependent's parent exists, and no column is its own ancestor
//! - A dependent column is only visible when its parent is visible

mod errors;
mod loader;
mod model;
mod types;

pub use errors::{ColumnError, ColumnResult};
pub use loader::ColumnLoader;
pub use model::ColumnModel;
pub use types::{Classification, Column, DataKind};
