//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::buckets::BucketsArgs;
use crate::commands::report::ReportArgs;

/// Work-time statistics from calendar events.
///
/// Splits configured work time into leave, support, meeting, improvement and
/// development time, resolving overlaps by category priority.
#[derive(Debug, Parser)]
#[command(name = "wt", version, about, long_about = None)]
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
    /// Show hours and shares per category.
    Report(ReportArgs),

    /// List the intervals in every time bucket.
    Buckets(BucketsArgs),
}
