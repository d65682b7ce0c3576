//! Table accessor: validated CRUD over one table

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use super::errors::{AccessError, AccessResult};
use super::hooks::{Condition, Hooks};
use crate::observability::{Event, Logger};
use crate::schema::{PrepareError, Preparer, Record, Schema, SchemaError, ValidationMode, Value};
use crate::store::{Predicate, RecordId, Store};

const ACCESSOR_SUFFIX: &str = "_model";

/// Derives a table name from an accessor name: `User_model` becomes `user`
pub fn derive_table_name(accessor: &str) -> String {
    let lower = accessor.to_lowercase();
    match lower.strip_suffix(ACCESSOR_SUFFIX) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => lower,
    }
}

/// Naming overrides and validation mode for a table accessor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub mode: ValidationMode,
}

impl TableConfig {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn lenient() -> Self {
        Self {
            mode: ValidationMode::Lenient,
            ..Self::default()
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = Some(primary_key.into());
        self
    }
}

/// Validated access to one table.
///
/// Table name, column prefix and primary key are resolved on first use and
/// cached. Writes pass through hooks, then the schema, then the store.
pub struct Table<S: Store> {
    store: S,
    schema: Schema,
    accessor: String,
    mode: ValidationMode,
    table: OnceCell<String>,
    prefix: OnceCell<String>,
    primary_key: OnceCell<String>,
    hooks: Hooks,
}

impl<S: Store> Table<S> {
    /// Creates an accessor named `accessor` over `store`
    pub fn new(accessor: impl Into<String>, schema: Schema, store: S, config: TableConfig) -> Self {
        Self {
            store,
            schema,
            accessor: accessor.into(),
            mode: config.mode,
            table: config.table.map(OnceCell::from).unwrap_or_default(),
            prefix: config.prefix.map(OnceCell::from).unwrap_or_default(),
            primary_key: config.primary_key.map(OnceCell::from).unwrap_or_default(),
            hooks: Hooks::new(),
        }
    }

    /// Registers a pre-create hook
    pub fn before_create<F>(mut self, hook: F) -> Self
    where
        F: Fn(Record) -> Option<Record> + 'static,
    {
        self.hooks.add_create(Box::new(hook));
        self
    }

    /// Registers a pre-update hook
    pub fn before_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(Record, &Condition) -> Option<Record> + 'static,
    {
        self.hooks.add_update(Box::new(hook));
        self
    }

    /// Registers a pre-delete hook
    pub fn before_delete<F>(mut self, hook: F) -> Self
    where
        F: Fn(Condition) -> Option<Condition> + 'static,
    {
        self.hooks.add_delete(Box::new(hook));
        self
    }

    pub fn table_name(&self) -> &str {
        self.table.get_or_init(|| derive_table_name(&self.accessor))
    }

    pub fn prefix(&self) -> &str {
        self.prefix
            .get_or_init(|| format!("{}_", self.table_name()))
    }

    pub fn primary_key(&self) -> &str {
        self.primary_key.get_or_init(|| {
            let column = self.schema.primary_key().unwrap_or("id");
            format!("{}{}", self.prefix(), column)
        })
    }

    pub fn set_table_name(&mut self, table: impl Into<String>) {
        self.table = OnceCell::from(table.into());
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = OnceCell::from(prefix.into());
    }

    pub fn set_primary_key(&mut self, primary_key: impl Into<String>) {
        self.primary_key = OnceCell::from(primary_key.into());
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn preparer(&self) -> Preparer {
        Preparer::new(self.prefix(), self.mode)
    }

    /// Validates and prepares a record, mapping a lenient rejection to `None`
    fn prepare(&self, record: &Record, apply_defaults: bool) -> AccessResult<Option<Record>> {
        match self.preparer().prepare(&self.schema, record, apply_defaults) {
            Ok(prepared) => Ok(Some(prepared)),
            Err(PrepareError::Rejected) => Ok(None),
            Err(PrepareError::Invalid(err)) => Err(err.into()),
        }
    }

    fn predicate(&self, condition: &Condition) -> Predicate {
        match condition {
            Condition::PrimaryKey(value) => {
                let mut predicate = Predicate::with_capacity(1);
                predicate.insert(self.primary_key().to_string(), value.clone());
                predicate
            }
            Condition::Columns(columns) => columns
                .iter()
                .map(|(name, value)| (format!("{}{}", self.prefix(), name), value.clone()))
                .collect(),
        }
    }

    fn hook_aborted(&self, operation: &str) {
        Logger::event(
            Event::HookAborted,
            &[("operation", operation), ("table", self.table_name())],
        );
    }

    fn not_applied(&self, operation: &str, affected: u64) {
        let affected = affected.to_string();
        Logger::event(
            Event::WriteNotApplied,
            &[
                ("affected", affected.as_str()),
                ("operation", operation),
                ("table", self.table_name()),
            ],
        );
    }

    /// Inserts a record after hooks and validation with defaults.
    ///
    /// Returns the generated identifier when exactly one row was inserted.
    /// A table without a generated key reports `RecordId(0)`.
    pub fn create(&mut self, record: Record) -> AccessResult<Option<RecordId>> {
        let Some(record) = self.hooks.run_create(record) else {
            self.hook_aborted("create");
            return Ok(None);
        };
        let Some(prepared) = self.prepare(&record, true)? else {
            return Ok(None);
        };

        let table = self.table_name().to_string();
        let affected = self.store.insert(&table, &prepared)?;
        if affected != 1 {
            self.not_applied("create", affected);
            return Ok(None);
        }

        let id = self.store.last_insert_id().unwrap_or_default();
        Logger::event(
            Event::RecordCreated,
            &[("id", id.to_string().as_str()), ("table", table.as_str())],
        );
        Ok(Some(id))
    }

    /// `create` reporting only success
    pub fn create_flag(&mut self, record: Record) -> AccessResult<bool> {
        Ok(self.create(record)?.is_some())
    }

    /// Updates the single row matching `condition`. Defaults are not applied.
    pub fn update(&mut self, condition: impl Into<Condition>, record: Record) -> AccessResult<bool> {
        let condition = condition.into();
        let Some(record) = self.hooks.run_update(record, &condition) else {
            self.hook_aborted("update");
            return Ok(false);
        };
        let Some(prepared) = self.prepare(&record, false)? else {
            return Ok(false);
        };

        let table = self.table_name().to_string();
        let predicate = self.predicate(&condition);
        let affected = self.store.update(&table, &predicate, &prepared)?;
        if affected != 1 {
            self.not_applied("update", affected);
            return Ok(false);
        }

        Logger::event(Event::RecordUpdated, &[("table", table.as_str())]);
        Ok(true)
    }

    /// Deletes the single row matching `condition`
    pub fn delete(&mut self, condition: impl Into<Condition>) -> AccessResult<bool> {
        let Some(condition) = self.hooks.run_delete(condition.into()) else {
            self.hook_aborted("delete");
            return Ok(false);
        };

        let table = self.table_name().to_string();
        let predicate = self.predicate(&condition);
        let affected = self.store.delete(&table, &predicate)?;
        if affected != 1 {
            self.not_applied("delete", affected);
            return Ok(false);
        }

        Logger::event(Event::RecordDeleted, &[("table", table.as_str())]);
        Ok(true)
    }

    /// Row whose primary key equals `key`
    pub fn get(&self, key: impl Into<Value>) -> AccessResult<Option<Record>> {
        let predicate = self.predicate(&Condition::PrimaryKey(key.into()));
        Ok(self.store.select_one(self.table_name(), &predicate)?)
    }

    /// Every row of the table
    pub fn get_all(&self) -> AccessResult<Vec<Record>> {
        Ok(self.store.select_all(self.table_name())?)
    }

    /// Whether any row holds `value` in `column`.
    ///
    /// A column missing from the schema yields `None` in lenient mode and
    /// an `UndefinedColumn` error in strict mode.
    pub fn column_exists(&self, column: &str, value: impl Into<Value>) -> AccessResult<Option<bool>> {
        if !self.schema.contains(column) {
            return match self.mode {
                ValidationMode::Strict => Err(AccessError::Schema(
                    SchemaError::undefined_column(column),
                )),
                ValidationMode::Lenient => Ok(None),
            };
        }

        let mut predicate = Predicate::with_capacity(1);
        predicate.insert(format!("{}{}", self.prefix(), column), value.into());
        let count = self.store.count(self.table_name(), &predicate)?;
        Ok(Some(count > 0))
    }
}
