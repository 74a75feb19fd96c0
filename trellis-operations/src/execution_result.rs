//! Execution result types for operations

use crate::LogEntry;

/// Outcome of executing an operation.
///
/// Mutations come back `Logged` so a processor can append them to the audit
/// trail, reads come back `Unlogged`, and failures may still carry an entry
/// describing what was attempted.
#[derive(Debug)]
pub enum ExecutionResult<T, E> {
    /// State changed; the entry should be persisted
    Logged { value: T, log_entry: LogEntry },
    /// Read-only, nothing to record
    Unlogged { value: T },
    /// The operation failed
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// Drop the log entry and return a plain `Result`
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Logged { value, .. } | Self::Unlogged { value } => Ok(value),
            Self::Failed { error, .. } => Err(error),
        }
    }

    /// Separate the outcome from its log entry
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    /// Borrow the log entry, if any
    pub fn log_entry(&self) -> Option<&LogEntry> {
        match self {
            Self::Logged { log_entry, .. } => Some(log_entry),
            Self::Failed { log_entry, .. } => log_entry.as_ref(),
            Self::Unlogged { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry() -> LogEntry {
        LogEntry::new("add card", json!({}), json!({"id": "itm_1"}), 3)
    }

    #[test]
    fn test_logged_splits_into_value_and_entry() {
        let result: ExecutionResult<u32, String> = ExecutionResult::Logged {
            value: 7,
            log_entry: entry(),
        };
        assert!(result.log_entry().is_some());

        let (value, log) = result.split();
        assert_eq!(value.unwrap(), 7);
        assert_eq!(log.unwrap().op, "add card");
    }

    #[test]
    fn test_unlogged_has_no_entry() {
        let result: ExecutionResult<u32, String> = ExecutionResult::Unlogged { value: 1 };
        assert!(result.log_entry().is_none());
        assert!(!result.is_failed());
        assert_eq!(result.into_result().unwrap(), 1);
    }

    #[test]
    fn test_failed_keeps_optional_entry() {
        let result: ExecutionResult<u32, String> = ExecutionResult::Failed {
            error: "boom".into(),
            log_entry: None,
        };
        assert!(result.is_failed());
        assert!(result.log_entry().is_none());
        assert_eq!(result.into_result().unwrap_err(), "boom");
    }
}
