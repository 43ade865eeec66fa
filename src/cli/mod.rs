//! CLI module for tabledeck
//!
//! Provides command-line interface for:
//! - query: filter and sort records into a table view
//! - describe: full statistics of one column
//! - compute: one aggregate of one column
//! - export: delimited text of the table view
//! - columns: column definitions by category

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    build_session, columns, compute, describe, export, load_config, load_model, parse_request,
    query, run, run_command, RequestError, RequestResult, TableRequest,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response, write_text};
