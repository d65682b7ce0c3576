//! Observable events
//!
//! Events are explicit and typed. Each log line names exactly one event.

use std::fmt;

use super::logger::Severity;

/// Events emitted by validation, record access and scaffolding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,
    /// Schema descriptors loaded from disk
    SchemasLoaded,

    // Validation
    /// Record rejected in lenient mode; detail is logged, not returned
    PrepareRejected,

    // Record access
    /// A pre-operation hook aborted the operation
    HookAborted,
    /// Record inserted
    RecordCreated,
    /// Record updated
    RecordUpdated,
    /// Record deleted
    RecordDeleted,
    /// Store reported an affected-row count other than one
    WriteNotApplied,

    // Scaffolding
    /// Introspection of the store begins
    IntrospectStart,
    /// All tables described
    IntrospectComplete,
    /// Existing schema file copied aside
    BackupCreated,
    /// Schema file written
    ScaffoldWritten,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::PrepareRejected => "PREPARE_REJECTED",
            Event::HookAborted => "HOOK_ABORTED",
            Event::RecordCreated => "RECORD_CREATED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::WriteNotApplied => "WRITE_NOT_APPLIED",
            Event::IntrospectStart => "INTROSPECT_START",
            Event::IntrospectComplete => "INTROSPECT_COMPLETE",
            Event::BackupCreated => "BACKUP_CREATED",
            Event::ScaffoldWritten => "SCAFFOLD_WRITTEN",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::PrepareRejected | Event::HookAborted | Event::WriteNotApplied => Severity::Warn,
            Event::RecordCreated | Event::RecordUpdated | Event::RecordDeleted => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake() {
        for event in [
            Event::ConfigLoaded,
            Event::PrepareRejected,
            Event::WriteNotApplied,
            Event::ScaffoldWritten,
        ] {
            let name = event.as_str();
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_rejections_warn() {
        assert_eq!(Event::PrepareRejected.severity(), Severity::Warn);
        assert_eq!(Event::HookAborted.severity(), Severity::Warn);
        assert_eq!(Event::ScaffoldWritten.severity(), Severity::Info);
    }
}
