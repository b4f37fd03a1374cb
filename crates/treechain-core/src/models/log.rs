//! Audit log model.

use serde::{Deserialize, Serialize};

/// Severity of an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
}

/// One append-only audit-trail entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    /// Human-readable action description
    pub message: String,

    /// Severity
    #[serde(rename = "type")]
    pub level: LogLevel,

    /// Append time, milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl LogEntry {
    /// Create an entry.
    pub fn new(message: impl Into<String>, level: LogLevel, timestamp: u64) -> Self {
        Self {
            message: message.into(),
            level,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry() {
        let entry = LogEntry::new("SYNC: aligned", LogLevel::Success, 42);
        assert_eq!(entry.message, "SYNC: aligned");
        assert_eq!(entry.level, LogLevel::Success);
    }

    #[test]
    fn serialize_wire_names() {
        let entry = LogEntry::new("hello", LogLevel::Warning, 42);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["timestamp"], 42);
    }
}
