//! Board operation processor: execute, attribute, persist the log entry

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::types::BoardId;
use serde_json::Value;
use trellis_operations::{async_trait, Execute, OperationProcessor};

/// Runs commands and appends their log entries to the global activity log
/// and, when the command touched a board, to that board's log.
///
/// Log write failures are reported through tracing and never fail the
/// command; the mutation has already happened.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoardOperationProcessor;

impl BoardOperationProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OperationProcessor<BoardContext, BoardError> for BoardOperationProcessor {
    async fn process<O>(&self, operation: &O, ctx: &BoardContext) -> Result<Value, BoardError>
    where
        O: Execute<BoardContext, BoardError>,
    {
        let (result, log_entry) = operation.execute(ctx).await.split();

        if let Some(entry) = log_entry {
            let entry = entry.with_actor(ctx.user().as_str());
            let store = ctx.store();

            if let Err(e) = store.append_activity(&entry).await {
                tracing::warn!(op = %entry.op, error = %e, "failed to append activity log");
            }
            if let Some(scope) = &entry.scope {
                let board = BoardId::from_string(scope.as_str());
                if let Err(e) = store.append_board_log(&board, &entry).await {
                    tracing::warn!(op = %entry.op, %board, error = %e, "failed to append board log");
                }
            }
        }

        result
    }
}
