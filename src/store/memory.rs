//! In-memory store
//!
//! Holds tables as column metadata plus rows. Used by tests and by the CLI
//! against a JSON snapshot of a live database:
//!
//! ```json
//! { "tables": { "user": { "columns": [ {"Field": "user_id", "Type": "int(11)"} ], "rows": [] } } }
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use super::{ColumnMeta, Predicate, RecordId, Store};
use crate::schema::{PreparedRecord, Record, Value};

/// One table: metadata in column order, rows keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryTable {
    pub columns: Vec<ColumnMeta>,
    #[serde(default)]
    pub rows: Vec<Record>,
}

impl MemoryTable {
    pub fn new(columns: Vec<ColumnMeta>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn auto_increment_column(&self) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.is_auto_increment())
    }

    fn next_id(&self, column: &str) -> u64 {
        self.rows
            .iter()
            .filter_map(|row| match row.get(column) {
                Some(Value::Int(n)) if *n > 0 => Some(*n as u64),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    tables: IndexMap<String, MemoryTable>,
}

/// Store holding every table in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: IndexMap<String, MemoryTable>,
    last_insert_id: Option<RecordId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads tables from a JSON snapshot file
    pub fn from_snapshot(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        Ok(Self {
            tables: snapshot.tables,
            last_insert_id: None,
        })
    }

    /// Writes every table to a JSON snapshot file
    pub fn save_snapshot(&self, path: &Path) -> StoreResult<()> {
        let snapshot = Snapshot {
            tables: self.tables.clone(),
        };
        fs::write(path, serde_json::to_string_pretty(&snapshot)?)?;
        Ok(())
    }

    /// Creates or replaces a table
    pub fn create_table(&mut self, name: impl Into<String>, columns: Vec<ColumnMeta>) {
        self.tables.insert(name.into(), MemoryTable::new(columns));
    }

    /// Builder form of `create_table`
    pub fn with_table(mut self, name: impl Into<String>, columns: Vec<ColumnMeta>) -> Self {
        self.create_table(name, columns);
        self
    }

    pub fn table(&self, name: &str) -> Option<&MemoryTable> {
        self.tables.get(name)
    }

    fn table_ref(&self, name: &str) -> StoreResult<&MemoryTable> {
        self.tables
            .get(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }

    fn table_mut(&mut self, name: &str) -> StoreResult<&mut MemoryTable> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }
}

fn check_columns<'a>(
    table_name: &str,
    table: &MemoryTable,
    names: impl IntoIterator<Item = &'a String>,
) -> StoreResult<()> {
    for name in names {
        if table.column(name).is_none() {
            return Err(StoreError::UnknownColumn {
                table: table_name.to_string(),
                column: name.clone(),
            });
        }
    }
    Ok(())
}

fn not_null_violation(table: &str, column: &str) -> StoreError {
    StoreError::Constraint {
        table: table.to_string(),
        column: column.to_string(),
        reason: "column cannot be null".to_string(),
    }
}

/// Equality as the store sees it: dates compare as their text
fn values_equal(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => (*a as f64) == *b,
        (Value::Null, Value::Null) => true,
        (a, b) => match (a.as_str(), b.as_str()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
    }
}

fn matches(row: &Record, predicate: &Predicate) -> bool {
    predicate.iter().all(|(column, wanted)| {
        row.get(column)
            .is_some_and(|stored| values_equal(stored, wanted))
    })
}

impl Store for MemoryStore {
    fn insert(&mut self, table_name: &str, record: &PreparedRecord) -> StoreResult<u64> {
        let table = self.table_mut(table_name)?;
        check_columns(table_name, table, record.keys())?;

        let generated = table.auto_increment_column().and_then(|meta| {
            match record.get(&meta.name) {
                None | Some(Value::Null) => Some((meta.name.clone(), table.next_id(&meta.name))),
                Some(_) => None,
            }
        });

        let mut row = Record::with_capacity(table.columns.len());
        for meta in &table.columns {
            let value = match (record.get(&meta.name), &generated) {
                (_, Some((column, id))) if *column == meta.name => Value::Int(*id as i64),
                (Some(value), _) => value.clone(),
                (None, _) => match &meta.default {
                    Some(literal) => Value::String(literal.clone()),
                    None => Value::Null,
                },
            };
            if value.is_null() && !meta.nullable {
                return Err(not_null_violation(table_name, &meta.name));
            }
            row.insert(meta.name.clone(), value);
        }

        let assigned = match (&generated, table.auto_increment_column()) {
            (Some((_, id)), _) => Some(RecordId(*id)),
            (None, Some(meta)) => match row.get(&meta.name) {
                Some(Value::Int(n)) if *n > 0 => Some(RecordId(*n as u64)),
                _ => None,
            },
            (None, None) => None,
        };

        table.rows.push(row);
        self.last_insert_id = assigned;
        Ok(1)
    }

    fn last_insert_id(&self) -> Option<RecordId> {
        self.last_insert_id
    }

    fn update(
        &mut self,
        table_name: &str,
        predicate: &Predicate,
        record: &PreparedRecord,
    ) -> StoreResult<u64> {
        let table = self.table_mut(table_name)?;
        check_columns(table_name, table, record.keys().chain(predicate.keys()))?;

        for (column, value) in record {
            let nullable = table.column(column).is_some_and(|meta| meta.nullable);
            if value.is_null() && !nullable {
                return Err(not_null_violation(table_name, column));
            }
        }

        let mut affected = 0;
        for row in table.rows.iter_mut().filter(|row| matches(row, predicate)) {
            for (column, value) in record {
                row.insert(column.clone(), value.clone());
            }
            affected += 1;
        }
        Ok(affected)
    }

    fn delete(&mut self, table_name: &str, predicate: &Predicate) -> StoreResult<u64> {
        let table = self.table_mut(table_name)?;
        check_columns(table_name, table, predicate.keys())?;

        let before = table.rows.len();
        table.rows.retain(|row| !matches(row, predicate));
        Ok((before - table.rows.len()) as u64)
    }

    fn select_one(&self, table_name: &str, predicate: &Predicate) -> StoreResult<Option<Record>> {
        let table = self.table_ref(table_name)?;
        check_columns(table_name, table, predicate.keys())?;
        Ok(table.rows.iter().find(|row| matches(row, predicate)).cloned())
    }

    fn select_all(&self, table_name: &str) -> StoreResult<Vec<Record>> {
        Ok(self.table_ref(table_name)?.rows.clone())
    }

    fn count(&self, table_name: &str, predicate: &Predicate) -> StoreResult<u64> {
        let table = self.table_ref(table_name)?;
        check_columns(table_name, table, predicate.keys())?;
        Ok(table.rows.iter().filter(|row| matches(row, predicate)).count() as u64)
    }

    fn list_tables(&self) -> StoreResult<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }

    fn describe_columns(&self, table_name: &str) -> StoreResult<Vec<ColumnMeta>> {
        Ok(self.table_ref(table_name)?.columns.clone())
    }
}
