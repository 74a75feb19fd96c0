//! MoveColumn command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::execution::{self, Applied};
use crate::relocate;
use crate::types::ColumnId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use trellis_operations::{async_trait, operation, Execute, ExecutionResult};

/// Move a column to a new position within its board
#[operation(
    verb = "move",
    noun = "column",
    description = "Move a column between two neighbors on its board"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveColumn {
    /// The column ID to move
    pub id: ColumnId,
    /// Column the moved one should follow
    pub before: Option<ColumnId>,
    /// Column the moved one should precede
    pub after: Option<ColumnId>,
}

impl MoveColumn {
    /// Move to the right end of the board
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            before: None,
            after: None,
        }
    }

    pub fn before(mut self, neighbor: impl Into<ColumnId>) -> Self {
        self.before = Some(neighbor.into());
        self
    }

    pub fn after(mut self, neighbor: impl Into<ColumnId>) -> Self {
        self.after = Some(neighbor.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for MoveColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result: Result<Applied> = async {
            let store = ctx.store();
            let _lock = store.lock_with_timeout().await?;
            let (board, column) = ctx.owned_column(&self.id).await?;

            let siblings = store.read_columns(&board.id).await?;
            let plan = relocate::plan_move(
                store.allocator(),
                column,
                &board.id,
                siblings,
                self.before.as_ref(),
                self.after.as_ref(),
            )?;

            let persisted = relocate::persist(&plan, move |column| store.write_column(column)).await;
            store.invalidate(&board.id).await?;
            persisted?;

            let mut value = serde_json::to_value(plan.moved())?;
            value["rebalanced"] = Value::Bool(plan.rebalanced);
            Ok(Applied::new(board.id, value))
        }
        .await;

        execution::logged(self, start, result)
    }
}
