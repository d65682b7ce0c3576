//! Observability for rowguard
//!
//! Structured JSON logging of typed events. Logging never changes the
//! outcome of an operation and never fails the caller.
//!
//! ```ignore
//! use rowguard::observability::{Event, Logger};
//!
//! Logger::event(Event::ScaffoldWritten, &[("path", "src/schemas/user_schema.rs")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Logs a lifecycle event without fields
pub fn log_event(event: Event) {
    Logger::event(event, &[]);
}
