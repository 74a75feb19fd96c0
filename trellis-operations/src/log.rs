//! Log entry types for operation tracking

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One executed operation, as written to the JSONL activity logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ULID of this entry
    pub id: String,

    pub timestamp: DateTime<Utc>,

    /// Canonical op string, e.g. "move card"
    pub op: String,

    /// Normalized input parameters
    pub input: Value,

    /// Result value, or `{"error": ...}` for failures
    pub output: Value,

    /// User the operation ran on behalf of
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Board the operation touched, used to route the entry to a per-board log
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    pub duration_ms: u64,
}

impl LogEntry {
    pub fn new(op: impl Into<String>, input: Value, output: Value, duration_ms: u64) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            op: op.into(),
            input,
            output,
            actor: None,
            scope: None,
            duration_ms,
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_fields_are_omitted() {
        let entry = LogEntry::new("get board", json!({}), json!({}), 0);
        let line = serde_json::to_string(&entry).unwrap();
        assert!(!line.contains("actor"));
        assert!(!line.contains("scope"));
    }

    #[test]
    fn test_builders_set_actor_and_scope() {
        let entry = LogEntry::new("move card", json!({"id": "itm_a"}), json!({}), 2)
            .with_actor("usr_1")
            .with_scope("brd_1");
        assert_eq!(entry.actor.as_deref(), Some("usr_1"));
        assert_eq!(entry.scope.as_deref(), Some("brd_1"));

        let parsed: LogEntry = serde_json::from_str(&serde_json::to_string(&entry).unwrap()).unwrap();
        assert_eq!(parsed, entry);
    }
}
