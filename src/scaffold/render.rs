//! Renders schemas as source text
//!
//! Rendering is presentational only. The Rust form rebuilds exactly the
//! schema it was given (see `tests/fixtures/`); the JSON form is what
//! `SchemaLoader` reads.

use std::fmt::{self, Write as _};

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use super::errors::ScaffoldResult;
use crate::catalog::Flag;
use crate::schema::{ColumnDef, Length, Schema, Value};

/// Output form of a generated schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// Rust module exposing `pub fn schema() -> Schema`
    #[default]
    Rust,
    /// JSON descriptor
    Json,
}

impl RenderFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            RenderFormat::Rust => "rs",
            RenderFormat::Json => "json",
        }
    }
}

/// Schema renderer with header metadata
#[derive(Debug, Clone)]
pub struct Renderer {
    author: String,
    copyright: String,
    year: i32,
    format: RenderFormat,
}

impl Renderer {
    pub fn new(author: impl Into<String>, copyright: impl Into<String>, format: RenderFormat) -> Self {
        Self {
            author: author.into(),
            copyright: copyright.into(),
            year: Local::now().year(),
            format,
        }
    }

    /// Fixes the copyright year
    pub fn year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn format(&self) -> RenderFormat {
        self.format
    }

    /// File name for a table's generated schema
    pub fn file_name(&self, table: &str) -> String {
        format!("{}_schema.{}", table.to_lowercase(), self.format.extension())
    }

    pub fn render(&self, schema: &Schema) -> ScaffoldResult<String> {
        match self.format {
            RenderFormat::Rust => {
                let mut out = String::new();
                self.render_rust(schema, &mut out)?;
                Ok(out)
            }
            RenderFormat::Json => {
                let mut json = serde_json::to_string_pretty(schema)?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    fn render_rust(&self, schema: &Schema, out: &mut String) -> fmt::Result {
        let file_name = self.file_name(&schema.table);

        writeln!(out, "//! {} schema", capitalize(&schema.table))?;
        writeln!(out, "//!")?;
        writeln!(out, "//! Author: {}", self.author)?;
        writeln!(out, "//! Copyright (C) {}, {}", self.year, self.copyright)?;
        writeln!(out)?;

        let uses_flags = schema.iter().any(|(_, def)| !def.flags.is_empty());
        let uses_length = schema.iter().any(|(_, def)| def.length.is_some());
        let uses_value = schema.iter().any(|(_, def)| def.default.is_some());

        let catalog_items = if uses_flags { "{DataType, Flag}" } else { "DataType" };
        writeln!(out, "use rowguard::catalog::{};", catalog_items)?;
        let mut schema_items = vec!["ColumnDef"];
        if uses_length {
            schema_items.push("Length");
        }
        schema_items.push("Schema");
        if uses_value {
            schema_items.push("Value");
        }
        writeln!(out, "use rowguard::schema::{{{}}};", schema_items.join(", "))?;
        writeln!(out)?;

        // Enumeration lists are hoisted into constants ahead of the builder
        let mut enum_count = 0;
        let mut rows: Vec<[String; 5]> = Vec::with_capacity(schema.len());
        for (name, def) in schema.iter() {
            let length = match &def.length {
                Some(Length::Values(values)) => {
                    enum_count += 1;
                    let literals: Vec<_> = values.iter().map(|v| format!("{:?}", v)).collect();
                    writeln!(
                        out,
                        "const E{}: &[&str] = &[{}];",
                        enum_count,
                        literals.join(", ")
                    )?;
                    format!("Some(Length::values(E{}))", enum_count)
                }
                other => length_expr(other.as_ref()),
            };
            rows.push([
                format!("{:?},", name),
                format!("DataType::{:?},", def.datatype),
                format!("{},", length),
                format!("{},", flags_expr(def)),
                default_expr(def.default.as_ref()),
            ]);
        }
        if enum_count > 0 {
            writeln!(out)?;
        }

        let widths: [usize; 4] = std::array::from_fn(|i| {
            rows.iter().map(|row| row[i].len()).max().unwrap_or(0)
        });

        writeln!(out, "pub fn schema() -> Schema {{")?;
        writeln!(out, "    Schema::new({:?})", schema.table)?;
        for row in &rows {
            writeln!(
                out,
                "        .column({:<w0$} ColumnDef::declare({:<w1$} {:<w2$} {:<w3$} {}))",
                row[0],
                row[1],
                row[2],
                row[3],
                row[4],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
                w3 = widths[3],
            )?;
        }
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "// End of file {}", file_name)?;
        writeln!(out, "// Location: ./src/schemas/{}", file_name)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn length_expr(length: Option<&Length>) -> String {
    match length {
        None => "None".to_string(),
        Some(Length::Max(max)) => format!("Some(Length::Max({}))", max),
        Some(Length::Precision { digits, scale }) => format!(
            "Some(Length::Precision {{ digits: {}, scale: {} }})",
            digits, scale
        ),
        Some(Length::Values(values)) => {
            let literals: Vec<_> = values.iter().map(|v| format!("{:?}", v)).collect();
            format!("Some(Length::values(&[{}]))", literals.join(", "))
        }
    }
}

fn flags_expr(def: &ColumnDef) -> String {
    let flags: Vec<_> = def
        .flags
        .iter()
        .map(|flag: Flag| format!("Flag::{:?}", flag))
        .collect();
    format!("&[{}]", flags.join(", "))
}

fn default_expr(default: Option<&Value>) -> String {
    match default {
        None => "None".to_string(),
        Some(Value::Null) => "Some(Value::Null)".to_string(),
        Some(Value::Int(n)) => format!("Some(Value::Int({}))", n),
        Some(Value::Float(n)) => format!("Some(Value::Float({:?}))", n),
        Some(Value::String(s)) => format!("Some(Value::String({:?}.into()))", s),
        Some(Value::Date(s)) => format!("Some(Value::Date({:?}.into()))", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;

    fn user_schema() -> Schema {
        Schema::new("user")
            .column(
                "id",
                ColumnDef::new(DataType::Int).flags(&[Flag::PrimaryKey, Flag::AutoIncrement]),
            )
            .column("name", ColumnDef::new(DataType::VarChar).length(32).flags(&[Flag::NotNull]))
            .column(
                "status",
                ColumnDef::new(DataType::Enum)
                    .values(&["active", "it's"])
                    .default_value("active"),
            )
            .column("balance", ColumnDef::new(DataType::Decimal).precision(10, 2).default_value(0.5))
    }

    fn renderer(format: RenderFormat) -> Renderer {
        Renderer::new("Jo <jo@example.com>", "Example Ltd", format).year(2024)
    }

    #[test]
    fn test_file_names() {
        assert_eq!(renderer(RenderFormat::Rust).file_name("User"), "user_schema.rs");
        assert_eq!(renderer(RenderFormat::Json).file_name("user"), "user_schema.json");
    }

    #[test]
    fn test_rust_header_and_footer() {
        let text = renderer(RenderFormat::Rust).render(&user_schema()).unwrap();
        assert!(text.starts_with("//! User schema\n"));
        assert!(text.contains("//! Author: Jo <jo@example.com>\n"));
        assert!(text.contains("//! Copyright (C) 2024, Example Ltd\n"));
        assert!(text.contains("use rowguard::catalog::{DataType, Flag};\n"));
        assert!(text.contains("use rowguard::schema::{ColumnDef, Length, Schema, Value};\n"));
        assert!(text.ends_with(
            "// End of file user_schema.rs\n// Location: ./src/schemas/user_schema.rs\n"
        ));
    }

    #[test]
    fn test_rust_columns_in_order() {
        let text = renderer(RenderFormat::Rust).render(&user_schema()).unwrap();
        let id = text.find(".column(\"id\"").unwrap();
        let name = text.find(".column(\"name\"").unwrap();
        let status = text.find(".column(\"status\"").unwrap();
        let balance = text.find(".column(\"balance\"").unwrap();
        assert!(id < name && name < status && status < balance);
    }

    #[test]
    fn test_rust_enum_constants() {
        let text = renderer(RenderFormat::Rust).render(&user_schema()).unwrap();
        assert!(text.contains("const E1: &[&str] = &[\"active\", \"it's\"];\n"));
        assert!(text.contains("Some(Length::values(E1)),"));
        assert!(text.contains("Some(Value::String(\"active\".into()))"));
        assert!(text.contains("Some(Length::Precision { digits: 10, scale: 2 }),"));
        assert!(text.contains("Some(Value::Float(0.5))"));
        assert!(text.contains("&[Flag::PrimaryKey, Flag::AutoIncrement],"));
    }

    #[test]
    fn test_rust_columns_aligned() {
        let text = renderer(RenderFormat::Rust).render(&user_schema()).unwrap();
        let starts: Vec<_> = text
            .lines()
            .filter(|line| line.contains(".column("))
            .map(|line| line.find("ColumnDef::declare").unwrap())
            .collect();
        assert_eq!(starts.len(), 4);
        assert!(starts.iter().all(|s| *s == starts[0]));
    }

    #[test]
    fn test_minimal_imports() {
        let schema = Schema::new("tag").column("label", ColumnDef::new(DataType::Text));
        let text = renderer(RenderFormat::Rust).render(&schema).unwrap();
        assert!(text.contains("use rowguard::catalog::DataType;\n"));
        assert!(text.contains("use rowguard::schema::{ColumnDef, Schema};\n"));
        assert!(!text.contains("const E"));
    }

    #[test]
    fn test_json_round_trip() {
        let schema = user_schema();
        let text = renderer(RenderFormat::Json).render(&schema).unwrap();
        let back: Schema = serde_json::from_str(&text).unwrap();
        assert_eq!(back, schema);
    }
}
