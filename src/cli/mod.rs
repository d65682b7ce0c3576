//! CLI module for rowguard
//!
//! Provides command-line interface for:
//! - tables: List tables of the catalog snapshot
//! - scaffold: Generate schema descriptors, optionally writing them
//! - prepare: Validate one record against a table schema

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{prepare, run, run_command, scaffold, tables};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response, write_text};
