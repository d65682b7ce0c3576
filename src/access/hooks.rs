//! Pre-write hooks
//!
//! Hooks run in registration order. Each receives the output of the previous
//! one; returning `None` aborts the operation before validation.

use crate::schema::{Record, Value};

/// Target of an update or delete
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Match on the primary key column
    PrimaryKey(Value),
    /// Match every listed (unprefixed) column
    Columns(Record),
}

impl Condition {
    pub fn primary_key(value: impl Into<Value>) -> Self {
        Condition::PrimaryKey(value.into())
    }
}

impl From<Record> for Condition {
    fn from(columns: Record) -> Self {
        Condition::Columns(columns)
    }
}

pub type CreateHook = Box<dyn Fn(Record) -> Option<Record>>;
pub type UpdateHook = Box<dyn Fn(Record, &Condition) -> Option<Record>>;
pub type DeleteHook = Box<dyn Fn(Condition) -> Option<Condition>>;

/// Ordered hook lists for one accessor
#[derive(Default)]
pub struct Hooks {
    create: Vec<CreateHook>,
    update: Vec<UpdateHook>,
    delete: Vec<DeleteHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_create(&mut self, hook: CreateHook) {
        self.create.push(hook);
    }

    pub fn add_update(&mut self, hook: UpdateHook) {
        self.update.push(hook);
    }

    pub fn add_delete(&mut self, hook: DeleteHook) {
        self.delete.push(hook);
    }

    pub fn run_create(&self, record: Record) -> Option<Record> {
        self.create.iter().try_fold(record, |record, hook| hook(record))
    }

    pub fn run_update(&self, record: Record, condition: &Condition) -> Option<Record> {
        self.update
            .iter()
            .try_fold(record, |record, hook| hook(record, condition))
    }

    pub fn run_delete(&self, condition: Condition) -> Option<Condition> {
        self.delete
            .iter()
            .try_fold(condition, |condition, hook| hook(condition))
    }

    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("create", &self.create.len())
            .field("update", &self.update.len())
            .field("delete", &self.delete.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::record;

    #[test]
    fn test_hooks_run_in_order() {
        let mut hooks = Hooks::new();
        hooks.add_create(Box::new(|mut r: Record| {
            r.insert("name".into(), Value::from("first"));
            Some(r)
        }));
        hooks.add_create(Box::new(|mut r: Record| {
            let name = format!("{}-second", r["name"]);
            r.insert("name".into(), Value::from(name));
            Some(r)
        }));

        let out = hooks.run_create(Record::new()).unwrap();
        assert_eq!(out["name"], Value::from("first-second"));
    }

    #[test]
    fn test_abort_stops_chain() {
        let mut hooks = Hooks::new();
        hooks.add_delete(Box::new(|_: Condition| None));
        hooks.add_delete(Box::new(|_: Condition| -> Option<Condition> {
            panic!("must not run")
        }));

        assert!(hooks.run_delete(Condition::primary_key(1)).is_none());
    }

    #[test]
    fn test_update_hook_sees_condition() {
        let mut hooks = Hooks::new();
        hooks.add_update(Box::new(|r: Record, condition: &Condition| match condition {
            Condition::PrimaryKey(Value::Int(1)) => None,
            _ => Some(r),
        }));

        let rec = record([("name", "x")]);
        assert!(hooks.run_update(rec.clone(), &Condition::primary_key(1)).is_none());
        assert_eq!(hooks.run_update(rec.clone(), &Condition::primary_key(2)), Some(rec));
    }

    #[test]
    fn test_empty_hooks_pass_through() {
        let hooks = Hooks::new();
        assert!(hooks.is_empty());
        let rec = record([("a", 1)]);
        assert_eq!(hooks.run_create(rec.clone()), Some(rec));
    }
}
