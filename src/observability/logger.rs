//! Structured JSON logger
//!
//! - One line per event, written synchronously
//! - `event` first, then `severity`, then fields sorted by key
//! - Lines below the minimum severity are dropped
//!
//! The minimum severity is read once from `ROWGUARD_LOG`
//! (`trace`, `info`, `warn`, `error`, `off`); the default is `warn`.

use std::env;
use std::fmt;
use std::io::{self, Write};
use std::sync::OnceLock;

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    /// Parses a `ROWGUARD_LOG` value. `None` means logging is off.
    fn from_filter(s: &str) -> Option<Option<Severity>> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Some(Severity::Trace)),
            "info" => Some(Some(Severity::Info)),
            "warn" => Some(Some(Severity::Warn)),
            "error" => Some(Some(Severity::Error)),
            "off" => Some(None),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static MIN_SEVERITY: OnceLock<Option<Severity>> = OnceLock::new();

fn min_severity() -> Option<Severity> {
    *MIN_SEVERITY.get_or_init(|| {
        env::var("ROWGUARD_LOG")
            .ok()
            .and_then(|v| Severity::from_filter(&v))
            .unwrap_or(Some(Severity::Warn))
    })
}

/// Structured logger writing JSON lines to stderr
pub struct Logger;

impl Logger {
    /// Logs an event at its own severity
    pub fn event(event: Event, fields: &[(&str, &str)]) {
        Self::log(event.severity(), event.as_str(), fields);
    }

    /// Logs a named event at the given severity
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        match min_severity() {
            Some(min) if severity >= min => {
                let line = render_line(severity, event, fields);
                let mut stderr = io::stderr().lock();
                let _ = stderr.write_all(line.as_bytes());
                let _ = stderr.flush();
            }
            _ => {}
        }
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }
}

/// Renders one log line, newline included
pub(crate) fn render_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(64 + fields.len() * 24);
    out.push_str("{\"event\":");
    push_json_str(&mut out, event);
    out.push_str(",\"severity\":\"");
    out.push_str(severity.as_str());
    out.push('"');

    let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    for (key, value) in sorted {
        out.push(',');
        push_json_str(&mut out, key);
        out.push(':');
        push_json_str(&mut out, value);
    }

    out.push_str("}\n");
    out
}

fn push_json_str(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!(Severity::from_filter("INFO"), Some(Some(Severity::Info)));
        assert_eq!(Severity::from_filter("off"), Some(None));
        assert_eq!(Severity::from_filter("loud"), None);
    }

    #[test]
    fn test_line_is_valid_json() {
        let line = render_line(Severity::Warn, "PREPARE_REJECTED", &[("column", "name")]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "PREPARE_REJECTED");
        assert_eq!(parsed["severity"], "WARN");
        assert_eq!(parsed["column"], "name");
    }

    #[test]
    fn test_fields_sorted() {
        let a = render_line(Severity::Info, "E", &[("zeta", "1"), ("alpha", "2")]);
        let b = render_line(Severity::Info, "E", &[("alpha", "2"), ("zeta", "1")]);
        assert_eq!(a, b);
        assert!(a.find("alpha").unwrap() < a.find("zeta").unwrap());
        assert!(a.find("\"event\"").unwrap() < a.find("\"severity\"").unwrap());
    }

    #[test]
    fn test_escapes() {
        let line = render_line(Severity::Info, "E", &[("msg", "say \"hi\"\n\u{1}")]);
        assert_eq!(line.matches('\n').count(), 1);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["msg"], "say \"hi\"\n\u{1}");
    }
}
