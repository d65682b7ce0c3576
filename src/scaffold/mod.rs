//! Schema scaffolding
//!
//! Introspects a store, renders one schema per table and optionally writes
//! the results to disk.

mod errors;
mod introspect;
mod render;
mod writer;

pub use errors::{ScaffoldError, ScaffoldResult};
pub use introspect::{parse_column, Introspector};
pub use render::{RenderFormat, Renderer};
pub use writer::{ScaffoldWriter, WriteReport};

use crate::observability::{Event, Logger};
use crate::schema::Schema;
use crate::store::Store;

/// One rendered schema
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub table: String,
    pub file_name: String,
    pub schema: Schema,
    pub contents: String,
}

/// Introspects every table of `store` and renders it
pub fn generate_all<S: Store>(
    store: &S,
    renderer: &Renderer,
    strip_prefix: bool,
) -> ScaffoldResult<Vec<GeneratedFile>> {
    Logger::event(Event::IntrospectStart, &[]);

    let schemas = Introspector::new(store)
        .strip_prefix(strip_prefix)
        .describe_all()?;

    let files = schemas
        .into_iter()
        .map(|schema| -> ScaffoldResult<GeneratedFile> {
            Ok(GeneratedFile {
                table: schema.table.clone(),
                file_name: renderer.file_name(&schema.table),
                contents: renderer.render(&schema)?,
                schema,
            })
        })
        .collect::<ScaffoldResult<Vec<_>>>()?;

    let count = files.len().to_string();
    Logger::event(Event::IntrospectComplete, &[("tables", count.as_str())]);
    Ok(files)
}
