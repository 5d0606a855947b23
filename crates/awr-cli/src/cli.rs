//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Daily ActivityWatch category report.
///
/// Queries a local ActivityWatch server for yesterday's active window time
/// and prints cumulative hours for every category and subcategory.
#[derive(Debug, Parser)]
#[command(name = "awr", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report hours per category for the previous day (default).
    Report {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the category rules sent to the server.
    Categories {
        /// Output as JSON, in the form embedded into the query.
        #[arg(long)]
        json: bool,
    },
}
