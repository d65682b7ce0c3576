//! Schema descriptor types
//!
//! A schema is an ordered mapping from unprefixed column name to its
//! definition. Column order is the canonical order used when rendering.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{AbstractType, Capability, ColumnFlags, DataType, Flag, TypeEntry};

use super::value::Value;

/// Declared length of a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Length {
    /// Maximum length (strings) or maximum value (numbers)
    Max(u64),
    /// Precision and scale of a scaled numeric column
    Precision { digits: u32, scale: u32 },
    /// Allowed values of an enumerated column, in declaration order
    Values(Vec<String>),
}

impl Length {
    /// Builds an enumeration list
    pub fn values(values: &[&str]) -> Self {
        Length::Values(values.iter().map(|v| v.to_string()).collect())
    }

    /// Numeric bound of the declaration, if it is numeric.
    ///
    /// `Precision { digits: 10, scale: 2 }` reads as `10.2`.
    pub fn numeric_bound(&self) -> Option<f64> {
        match self {
            Length::Max(n) => Some(*n as f64),
            Length::Precision { digits, scale } => format!("{}.{}", digits, scale).parse().ok(),
            Length::Values(_) => None,
        }
    }

    /// Declared enumeration values, if any
    pub fn enum_values(&self) -> Option<&[String]> {
        match self {
            Length::Values(values) => Some(values),
            _ => None,
        }
    }
}

/// Column definition: datatype, length, flags and default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColumnDefRepr")]
pub struct ColumnDef {
    pub datatype: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<Length>,
    #[serde(default, skip_serializing_if = "ColumnFlags::is_empty")]
    pub flags: ColumnFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Wire form of a column. Text defaults of date columns load as dates.
#[derive(Deserialize)]
struct ColumnDefRepr {
    datatype: DataType,
    #[serde(default)]
    length: Option<Length>,
    #[serde(default)]
    flags: ColumnFlags,
    #[serde(default)]
    default: Option<Value>,
}

impl From<ColumnDefRepr> for ColumnDef {
    fn from(repr: ColumnDefRepr) -> Self {
        let default = match (repr.datatype.abstract_type(), repr.default) {
            (AbstractType::Date, Some(Value::String(text))) => Some(Value::Date(text)),
            (_, other) => other,
        };
        Self {
            datatype: repr.datatype,
            length: repr.length,
            flags: repr.flags,
            default,
        }
    }
}

impl ColumnDef {
    /// Column of the given datatype without length, flags or default
    pub fn new(datatype: DataType) -> Self {
        Self {
            datatype,
            length: None,
            flags: ColumnFlags::NONE,
            default: None,
        }
    }

    /// Full declaration in one call; the form emitted by the scaffolder
    pub fn declare(
        datatype: DataType,
        length: Option<Length>,
        flags: &[Flag],
        default: Option<Value>,
    ) -> Self {
        Self {
            datatype,
            length,
            flags: ColumnFlags::new(flags),
            default,
        }
    }

    /// Sets a maximum length
    pub fn length(mut self, max: u64) -> Self {
        self.length = Some(Length::Max(max));
        self
    }

    /// Sets precision and scale
    pub fn precision(mut self, digits: u32, scale: u32) -> Self {
        self.length = Some(Length::Precision { digits, scale });
        self
    }

    /// Sets the enumerated values
    pub fn values(mut self, values: &[&str]) -> Self {
        self.length = Some(Length::values(values));
        self
    }

    /// Adds flags
    pub fn flags(mut self, flags: &[Flag]) -> Self {
        for flag in flags {
            self.flags.insert(*flag);
        }
        self
    }

    /// Sets the default value
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Catalog entry of the datatype
    pub fn entry(&self) -> TypeEntry {
        self.datatype.entry()
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(flag)
    }

    pub fn is_primary_key(&self) -> bool {
        self.has_flag(Flag::PrimaryKey)
    }

    /// Primary key generated by the store
    pub fn is_auto_increment_key(&self) -> bool {
        self.is_primary_key() && self.has_flag(Flag::AutoIncrement)
    }
}

/// Complete schema for one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Table the schema describes
    pub table: String,
    /// Column definitions in canonical order
    #[serde(default)]
    pub columns: IndexMap<String, ColumnDef>,
}

impl Schema {
    /// Creates an empty schema
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: IndexMap::new(),
        }
    }

    /// Appends a column
    pub fn column(mut self, name: impl Into<String>, def: ColumnDef) -> Self {
        self.columns.insert(name.into(), def);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ColumnDef)> {
        self.columns.iter()
    }

    /// First column flagged as primary key
    pub fn primary_key(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, def)| def.is_primary_key())
            .map(|(name, _)| name.as_str())
    }

    /// Validates the schema structure itself (not a record)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.columns.is_empty() {
            return Err(format!("Schema '{}' defines no columns", self.table));
        }

        for (name, def) in &self.columns {
            let entry = def.entry();

            if def.has_flag(Flag::AutoIncrement) && entry.abstract_type != AbstractType::Numeric {
                return Err(format!(
                    "Column '{}' cannot be auto-increment with datatype {}",
                    name, def.datatype
                ));
            }

            if entry.has(Capability::Enumerated) {
                match def.length.as_ref().and_then(Length::enum_values) {
                    Some(values) if !values.is_empty() => {}
                    _ => {
                        return Err(format!(
                            "Column '{}' of type {} must enumerate its values",
                            name, def.datatype
                        ))
                    }
                }
            }
        }

        Ok(())
    }
}
