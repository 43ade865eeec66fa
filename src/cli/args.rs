//! CLI argument definitions using clap
//!
//! Commands:
//! - tabledeck query [--config <path>]
//! - tabledeck describe --column <id> [--config <path>]
//! - tabledeck compute --column <id> --aggregate <kind> [--config <path>]
//! - tabledeck export [--no-footer] [--delimiter <char>] [--config <path>]
//! - tabledeck columns [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tabledeck - filter, sort and summarize tabular records
#[derive(Parser, Debug)]
#[command(name = "tabledeck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter and sort the request's records, printing the table view
    Query {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Describe one column over the filtered records
    Describe {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Column id
        #[arg(long)]
        column: String,
    },

    /// Compute a single aggregate of one column
    Compute {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Column id
        #[arg(long)]
        column: String,

        /// Aggregate name, e.g. average, median, earliest
        #[arg(long)]
        aggregate: String,
    },

    /// Export the table view as delimited text
    Export {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Leave out the aggregate footer row
        #[arg(long)]
        no_footer: bool,

        /// Field delimiter; overrides the configured one
        #[arg(long)]
        delimiter: Option<char>,
    },

    /// List column definitions grouped by category
    Columns {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
