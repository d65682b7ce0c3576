//! CLI argument definitions using clap
//!
//! Commands:
//! - rowguard tables --config <path>
//! - rowguard scaffold --config <path> [--write] [--no-backup] [--format rust|json]
//! - rowguard prepare --config <path> --table <name> [--prefix <p>] [--defaults]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::scaffold::RenderFormat;

/// rowguard - schema validation in front of CRUD, and schema scaffolding
#[derive(Parser, Debug)]
#[command(name = "rowguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List the tables of the catalog snapshot
    Tables {
        /// Path to configuration file
        #[arg(long, default_value = "./rowguard.json")]
        config: PathBuf,
    },

    /// Generate one schema per table from the catalog snapshot
    Scaffold {
        /// Path to configuration file
        #[arg(long, default_value = "./rowguard.json")]
        config: PathBuf,

        /// Write files into the output directory instead of printing
        #[arg(long)]
        write: bool,

        /// Overwrite existing files without a backup copy
        #[arg(long)]
        no_backup: bool,

        /// Output format (defaults to the configured one)
        #[arg(long, value_enum)]
        format: Option<RenderFormat>,
    },

    /// Validate one JSON record from stdin against a table schema
    Prepare {
        /// Path to configuration file
        #[arg(long, default_value = "./rowguard.json")]
        config: PathBuf,

        /// Table whose schema applies
        #[arg(long)]
        table: String,

        /// Column prefix (defaults to `<table>_`)
        #[arg(long)]
        prefix: Option<String>,

        /// Fill absent columns with their defaults
        #[arg(long)]
        defaults: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold_flags() {
        let cli = Cli::try_parse_from([
            "rowguard", "scaffold", "--write", "--no-backup", "--format", "json",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Scaffold {
                config: PathBuf::from("./rowguard.json"),
                write: true,
                no_backup: true,
                format: Some(RenderFormat::Json),
            }
        );
    }

    #[test]
    fn test_prepare_requires_table() {
        assert!(Cli::try_parse_from(["rowguard", "prepare"]).is_err());

        let cli = Cli::try_parse_from(["rowguard", "prepare", "--table", "user", "--defaults"])
            .unwrap();
        match cli.command {
            Command::Prepare {
                table,
                prefix,
                defaults,
                ..
            } => {
                assert_eq!(table, "user");
                assert_eq!(prefix, None);
                assert!(defaults);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
