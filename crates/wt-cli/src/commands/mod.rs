//! CLI subcommand implementations.

pub mod buckets;
pub mod report;
mod util;
