//! Reverse-engineers schemas from store column metadata
//!
//! Type strings look like `varchar(32)`, `decimal(10,2) unsigned` or
//! `enum('a','it''s')`. Integer display widths such as `int(11)` are not
//! value bounds and are dropped; the datatype's byte width applies instead.

use std::sync::OnceLock;

use regex::Regex;

use super::errors::{ScaffoldError, ScaffoldResult};
use crate::catalog::{AbstractType, Capability, ColumnFlags, DataType, Flag};
use crate::schema::{ColumnDef, Length, Schema, SchemaError, SchemaResult, Value};
use crate::store::{ColumnMeta, Store};

static TYPE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn type_pattern() -> &'static Regex {
    TYPE_PATTERN.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z]+)\s*(?:\((.*)\))?\s*(.*)$").expect("type pattern is valid")
    })
}

/// Reads table metadata from a store and builds schemas
pub struct Introspector<'a, S: Store> {
    store: &'a S,
    strip_prefix: bool,
}

impl<'a, S: Store> Introspector<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            strip_prefix: true,
        }
    }

    /// Whether `<table>_` is removed from column names (default: yes)
    pub fn strip_prefix(mut self, strip: bool) -> Self {
        self.strip_prefix = strip;
        self
    }

    /// Builds the schema of one table, columns in table order
    pub fn describe_table(&self, table: &str) -> ScaffoldResult<Schema> {
        let prefix = format!("{}_", table);
        let strip = self.strip_prefix.then_some(prefix.as_str());

        let mut schema = Schema::new(table);
        for meta in self.store.describe_columns(table)? {
            let (name, def) = parse_column(&meta, strip).map_err(|source| ScaffoldError::Column {
                table: table.to_string(),
                column: meta.name.clone(),
                source,
            })?;
            schema.columns.insert(name, def);
        }
        Ok(schema)
    }

    /// Builds the schema of every table in the store
    pub fn describe_all(&self) -> ScaffoldResult<Vec<Schema>> {
        self.store
            .list_tables()?
            .iter()
            .map(|table| self.describe_table(table))
            .collect()
    }
}

/// Turns one column's metadata into a schema column.
///
/// `strip` is removed from the front of the column name when present and
/// something remains after it.
pub fn parse_column(meta: &ColumnMeta, strip: Option<&str>) -> SchemaResult<(String, ColumnDef)> {
    let name = match strip.and_then(|prefix| meta.name.strip_prefix(prefix)) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => meta.name.clone(),
    };

    let captures = type_pattern()
        .captures(&meta.type_string)
        .ok_or_else(|| SchemaError::unknown_type(&meta.type_string))?;
    let token = captures.get(1).map_or("", |m| m.as_str());
    let args = captures.get(2).map(|m| m.as_str().trim());
    let modifiers = captures.get(3).map_or("", |m| m.as_str());

    if modifiers.contains(&['(', ')'][..]) {
        return Err(SchemaError::malformed_schema(
            &name,
            format!("Unbalanced parentheses in '{}'", meta.type_string),
        ));
    }

    let datatype = DataType::resolve(token)?;
    let length = match args {
        Some(args) if !args.is_empty() => parse_length(&name, datatype, args)?,
        _ => None,
    };
    if datatype.entry().has(Capability::Enumerated) && length.is_none() {
        return Err(SchemaError::schema_enum_missing(&name));
    }

    let mut flags = ColumnFlags::NONE;
    if meta.key_role.eq_ignore_ascii_case("PRI") {
        flags.insert(Flag::PrimaryKey);
    }
    if meta.is_auto_increment() {
        flags.insert(Flag::AutoIncrement);
    }
    if !meta.nullable && !flags.contains(Flag::PrimaryKey) {
        flags.insert(Flag::NotNull);
    }
    if modifiers
        .split_whitespace()
        .any(|word| word.eq_ignore_ascii_case("unsigned"))
    {
        flags.insert(Flag::Unsigned);
    }

    let default = meta
        .default
        .as_deref()
        .filter(|literal| !literal.is_empty())
        .map(|literal| typed_default(&name, datatype, literal))
        .transpose()?;

    let def = ColumnDef {
        datatype,
        length,
        flags,
        default,
    };
    Ok((name, def))
}

fn parse_length(column: &str, datatype: DataType, args: &str) -> SchemaResult<Option<Length>> {
    let entry = datatype.entry();

    if entry.has(Capability::Enumerated) {
        return parse_value_list(column, args).map(|values| Some(Length::Values(values)));
    }

    if entry.has(Capability::Scaled) {
        let mut parts = args.splitn(2, ',').map(str::trim);
        let digits = parts.next().and_then(|p| p.parse().ok());
        let scale = match parts.next() {
            Some(p) => p.parse().ok(),
            None => Some(0),
        };
        return match (digits, scale) {
            (Some(digits), Some(scale)) => Ok(Some(Length::Precision { digits, scale })),
            _ => Err(SchemaError::invalid_precision_spec(column)),
        };
    }

    if entry.abstract_type == AbstractType::String {
        return args
            .parse()
            .map(|max| Some(Length::Max(max)))
            .map_err(|_| {
                SchemaError::malformed_schema(column, format!("Invalid length '{}'", args))
            });
    }

    Ok(None)
}

/// Parses `'a','b''c'` into its values; doubled quotes are literal quotes
fn parse_value_list(column: &str, args: &str) -> SchemaResult<Vec<String>> {
    let malformed =
        |reason: &str| SchemaError::malformed_schema(column, format!("{} in ({})", reason, args));

    let mut values = Vec::new();
    let mut chars = args.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.next() != Some('\'') {
            return Err(malformed("Expected quoted value"));
        }

        let mut value = String::new();
        loop {
            match chars.next() {
                Some('\'') if chars.peek() == Some(&'\'') => {
                    chars.next();
                    value.push('\'');
                }
                Some('\'') => break,
                Some(c) => value.push(c),
                None => return Err(malformed("Unterminated value")),
            }
        }
        values.push(value);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(_) => return Err(malformed("Expected ','")),
        }
    }

    Ok(values)
}

/// Types a default literal by the column's abstract type.
///
/// Numeric defaults must parse as a number or a bit/hex literal (`b'01'`,
/// `x'1F'`, `0x1F`); anything else would never pass its own column.
fn typed_default(column: &str, datatype: DataType, literal: &str) -> SchemaResult<Value> {
    match datatype.abstract_type() {
        AbstractType::Numeric => literal
            .parse::<i64>()
            .map(Value::Int)
            .or_else(|_| literal.parse::<f64>().map(Value::Float))
            .ok()
            .or_else(|| parse_bit_literal(literal).map(Value::Int))
            .ok_or_else(|| {
                SchemaError::malformed_schema(
                    column,
                    format!("Numeric column has non-numeric default '{}'", literal),
                )
                .for_column(column)
            }),
        AbstractType::Date => Ok(Value::Date(literal.to_string())),
        AbstractType::String => Ok(Value::String(literal.to_string())),
    }
}

fn parse_bit_literal(literal: &str) -> Option<i64> {
    let quoted = |prefix: char| {
        let rest = literal.strip_prefix(|c: char| c.eq_ignore_ascii_case(&prefix))?;
        rest.strip_prefix('\'')?.strip_suffix('\'')
    };

    if let Some(digits) = quoted('b') {
        return i64::from_str_radix(digits, 2).ok();
    }
    if let Some(digits) = quoted('x') {
        return i64::from_str_radix(digits, 16).ok();
    }
    literal
        .strip_prefix("0x")
        .and_then(|digits| i64::from_str_radix(digits, 16).ok())
}
