//! Seedling CLI library.
//!
//! Drives the center discovery engine against a JSON export of notes:
//! configuration, command execution and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod notes;
pub mod output;

pub use cli::{Cli, Command};
pub use config::{OutputFormat, SeedlingConfig};
pub use error::{CliError, Result};
pub use output::Formatter;
