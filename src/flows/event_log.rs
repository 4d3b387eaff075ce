// src/flows/event_log.rs
use crate::models::{LogEntry, LogEvent};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

/// Append-only record of external calls made during one flow.
#[derive(Debug, Default)]
pub struct FlowLog {
    entries: Vec<LogEntry>,
}

impl FlowLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invoke(&mut self, flow: &str, data: impl Serialize) {
        self.push(LogEvent::Invoke, flow, data);
    }

    pub fn response(&mut self, flow: &str, data: impl Serialize) {
        self.push(LogEvent::Response, flow, data);
    }

    pub fn error(&mut self, flow: &str, data: impl Serialize) {
        self.push(LogEvent::Error, flow, data);
    }

    /// Moves another log's entries onto the end of this one.
    pub fn append(&mut self, other: FlowLog) {
        self.entries.extend(other.entries);
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }

    fn push(&mut self, event: LogEvent, flow: &str, data: impl Serialize) {
        let data = serde_json::to_value(data)
            .unwrap_or_else(|e| json!({ "unserializable": e.to_string() }));
        self.entries.push(LogEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
            flow: flow.to_string(),
            data,
        });
    }
}

/// Log payload for a failed call.
pub fn failure(subject: &str, value: &str, error: impl ToString) -> Value {
    json!({ subject: value, "error": error.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_append_order() {
        let mut log = FlowLog::new();
        log.invoke("affiliateSearch", json!({"brand": "NIKE"}));
        log.error("affiliateSearch", failure("brand", "NIKE", "boom"));

        let entries = log.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event, LogEvent::Invoke);
        assert_eq!(entries[1].event, LogEvent::Error);
        assert_eq!(entries[1].data["brand"], "NIKE");
        assert_eq!(entries[1].data["error"], "boom");
        assert_ne!(entries[0].id, entries[1].id);
    }
}
