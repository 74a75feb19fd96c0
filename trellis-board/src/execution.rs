//! Shared tail of every command: timing, log entry, result classification

use crate::error::{BoardError, Result};
use crate::types::{has_prefixed_form, BoardId};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;
use trellis_operations::{ExecutionResult, LogEntry, Operation};

/// A successful mutation and the board it touched
pub(crate) struct Applied {
    pub board: BoardId,
    pub value: Value,
}

impl Applied {
    pub fn new(board: BoardId, value: Value) -> Self {
        Self { board, value }
    }
}

/// Wrap the outcome of a mutating command in a logged result
pub(crate) fn logged<O>(op: &O, started: Instant, result: Result<Applied>) -> ExecutionResult<Value, BoardError>
where
    O: Operation + Serialize,
{
    let duration_ms = started.elapsed().as_millis() as u64;
    let input = serde_json::to_value(op).unwrap_or(Value::Null);

    match result {
        Ok(Applied { board, value }) => {
            tracing::info!(op = %op.op_string(), %board, duration_ms, "operation applied");
            ExecutionResult::Logged {
                log_entry: LogEntry::new(op.op_string(), input, value.clone(), duration_ms)
                    .with_scope(board.as_str()),
                value,
            }
        }
        Err(error) => {
            tracing::debug!(op = %op.op_string(), %error, "operation failed");
            let output = json!({ "error": error.to_string() });
            ExecutionResult::Failed {
                log_entry: Some(LogEntry::new(op.op_string(), input, output, duration_ms)),
                error,
            }
        }
    }
}

/// Trimmed, non-empty text for a name or title field
pub(crate) fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardError::invalid_value(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Check a client-generated id: `{prefix}_` followed by lowercase letters
/// and digits, not yet used by another element
pub(crate) fn check_client_id(field: &str, id: &str, prefix: &str, taken: bool) -> Result<()> {
    if !has_prefixed_form(id, prefix) {
        return Err(BoardError::invalid_value(
            field,
            format!("expected {}_ followed by [0-9a-z], got {:?}", prefix, id),
        ));
    }
    if taken {
        return Err(BoardError::invalid_value(field, format!("{} already exists", id)));
    }
    Ok(())
}

/// Wrap the outcome of a read-only command
pub(crate) fn unlogged(result: Result<Value>) -> ExecutionResult<Value, BoardError> {
    match result {
        Ok(value) => ExecutionResult::Unlogged { value },
        Err(error) => ExecutionResult::Failed {
            error,
            log_entry: None,
        },
    }
}
