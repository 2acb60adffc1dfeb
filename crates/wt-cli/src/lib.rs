//! Work-time CLI library.
//!
//! This crate provides the CLI interface over the `wt-core` engine.

mod cli;
pub mod commands;
mod config;
pub mod source;

pub use cli::{Cli, Commands};
pub use config::Config;
