//! CLI command implementations

use std::path::Path;

use serde_json::json;

use crate::observability::{Event, Logger};
use crate::scaffold::{self, RenderFormat, Renderer, ScaffoldWriter};
use crate::schema::{PrepareError, Preparer, Record, SchemaError, SchemaLoader};
use crate::store::{MemoryStore, Store};

use super::args::Command;
use super::config::Config;
use super::errors::CliResult;
use super::io::{read_request, write_error, write_response, write_text};

/// Code reported when lenient validation rejects a record
const REJECTED_CODE: &str = "ROWGUARD_REJECTED";

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Tables { config } => tables(&config),
        Command::Scaffold {
            config,
            write,
            no_backup,
            format,
        } => scaffold(&config, write, no_backup, format),
        Command::Prepare {
            config,
            table,
            prefix,
            defaults,
        } => prepare(&config, &table, prefix, defaults),
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    let path = config_path.display().to_string();
    Logger::event(Event::ConfigLoaded, &[("path", path.as_str())]);
    Ok(config)
}

fn open_catalog(config: &Config) -> CliResult<MemoryStore> {
    Ok(MemoryStore::from_snapshot(&config.catalog_path)?)
}

/// List the tables of the catalog snapshot
pub fn tables(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let store = open_catalog(&config)?;
    write_response(json!(store.list_tables()?))
}

/// Generate schemas for every table; print them, or write them when asked
pub fn scaffold(
    config_path: &Path,
    write: bool,
    no_backup: bool,
    format: Option<RenderFormat>,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let store = open_catalog(&config)?;

    let renderer = Renderer::new(
        config.author.as_str(),
        config.copyright.as_str(),
        format.unwrap_or(config.format),
    );
    let files = scaffold::generate_all(&store, &renderer, config.strip_prefix)?;

    if !write {
        for (i, file) in files.iter().enumerate() {
            if i > 0 {
                write_text("\n")?;
            }
            write_text(&file.contents)?;
        }
        return Ok(());
    }

    let writer = ScaffoldWriter::new(&config.output_dir, config.backup && !no_backup);
    let mut written = Vec::with_capacity(files.len());
    for file in &files {
        let report = writer.write(&file.file_name, &file.contents)?;
        written.push(json!({
            "table": file.table,
            "path": report.path.display().to_string(),
            "backup": report.backup.map(|b| b.display().to_string()),
        }));
    }

    write_response(json!({ "generated": files.len(), "written": written }))
}

/// Prepare one record read from stdin with the table's loaded schema
pub fn prepare(
    config_path: &Path,
    table: &str,
    prefix: Option<String>,
    apply_defaults: bool,
) -> CliResult<()> {
    let config = load_config(config_path)?;

    let mut loader = SchemaLoader::new(&config.schema_dir);
    let count = loader.load_all()?.to_string();
    Logger::event(Event::SchemasLoaded, &[("count", count.as_str())]);

    let Some(schema) = loader.get(table) else {
        let err = SchemaError::missing_schema(table);
        return write_error(err.code().code(), err.message());
    };

    let record: Record = serde_json::from_value(read_request()?)?;
    let prefix = prefix.unwrap_or_else(|| format!("{}_", table));
    let preparer = Preparer::new(prefix, config.mode());

    match preparer.prepare(schema, &record, apply_defaults) {
        Ok(prepared) => write_response(serde_json::to_value(prepared)?),
        Err(PrepareError::Invalid(err)) => write_error(err.code().code(), &err.to_string()),
        Err(PrepareError::Rejected) => write_error(REJECTED_CODE, "record rejected by schema"),
    }
}
