//! Schema loader for JSON schema descriptors
//!
//! - One file per table, any `*.json` file in the schema directory
//! - Files are the JSON form written by `rowguard scaffold --format json`
//! - Malformed files and duplicate tables abort loading

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// Registry of schemas indexed by table name
pub struct SchemaLoader {
    schema_dir: PathBuf,
    schemas: HashMap<String, Schema>,
}

impl SchemaLoader {
    /// Creates a loader reading from `schema_dir`
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
            schemas: HashMap::new(),
        }
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every JSON descriptor in the schema directory.
    ///
    /// A missing directory loads nothing.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        if !self.schema_dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            self.load_schema_file(path)?;
        }

        Ok(paths.len())
    }

    fn load_schema_file(&mut self, path: &Path) -> SchemaResult<()> {
        let source = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(&source, format!("Failed to read file: {}", e))
        })?;

        let schema: Schema = serde_json::from_str(&content)
            .map_err(|e| SchemaError::malformed_schema(&source, format!("Invalid JSON: {}", e)))?;

        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(&source, e))?;

        self.insert(schema)
    }

    /// Registers a schema directly
    pub fn register(&mut self, schema: Schema) -> SchemaResult<()> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema("<in-memory>", e))?;
        self.insert(schema)
    }

    fn insert(&mut self, schema: Schema) -> SchemaResult<()> {
        if self.schemas.contains_key(&schema.table) {
            return Err(SchemaError::duplicate_schema(&schema.table));
        }
        self.schemas.insert(schema.table.clone(), schema);
        Ok(())
    }

    pub fn get(&self, table: &str) -> Option<&Schema> {
        self.schemas.get(table)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.schemas.contains_key(table)
    }

    /// Registered table names, sorted
    pub fn tables(&self) -> Vec<&str> {
        let mut tables: Vec<_> = self.schemas.keys().map(String::as_str).collect();
        tables.sort_unstable();
        tables
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DataType, Flag};
    use crate::schema::{ColumnDef, SchemaErrorCode};
    use tempfile::TempDir;

    fn sample_schema() -> Schema {
        Schema::new("user")
            .column(
                "id",
                ColumnDef::new(DataType::Int).flags(&[Flag::PrimaryKey, Flag::AutoIncrement]),
            )
            .column("name", ColumnDef::new(DataType::VarChar).length(32))
    }

    #[test]
    fn test_register_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        loader.register(sample_schema()).unwrap();

        assert!(loader.contains("user"));
        assert_eq!(loader.get("user").unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        loader.register(sample_schema()).unwrap();

        let err = loader.register(sample_schema()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::DuplicateSchema);
    }

    #[test]
    fn test_load_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let json = serde_json::to_string_pretty(&sample_schema()).unwrap();
        fs::write(temp_dir.path().join("user_schema.json"), json).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        assert_eq!(loader.load_all().unwrap(), 1);
        assert_eq!(loader.get("user"), Some(&sample_schema()));
        assert_eq!(loader.tables(), vec!["user"]);
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("bad.json"), "{ not json").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MalformedSchema);
        assert!(err.message().contains("bad.json"));
    }

    #[test]
    fn test_structurally_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("t.json"),
            r#"{"table":"t","columns":{"kind":{"datatype":"ENUM"}}}"#,
        )
        .unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert!(err.message().contains("enumerate"));
    }

    #[test]
    fn test_missing_directory_loads_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path().join("absent"));
        assert_eq!(loader.load_all().unwrap(), 0);
        assert!(loader.is_empty());
    }
}
