//! AddColumn command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::execution::{self, Applied};
use crate::order;
use crate::types::{BoardId, Column, ColumnId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use trellis_operations::{async_trait, operation, Execute, ExecutionResult};

/// Append a column at the right end of a board
#[operation(
    verb = "add",
    noun = "column",
    description = "Append a column to the end of a board"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddColumn {
    /// The board to add the column to
    #[param(short = 'b')]
    pub board_id: BoardId,
    /// The column display name
    #[param(short = 'n')]
    pub name: String,
    /// Client-generated column ID (col_...), generated when absent
    pub id: Option<ColumnId>,
}

impl AddColumn {
    pub fn new(board_id: impl Into<BoardId>, name: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            name: name.into(),
            id: None,
        }
    }

    /// Use an id generated by the client, e.g. for an optimistic insert
    pub fn with_id(mut self, id: impl Into<ColumnId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for AddColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result: Result<Applied> = async {
            let name = execution::required_text("name", &self.name)?;

            let store = ctx.store();
            let _lock = store.lock_with_timeout().await?;
            let board = ctx.owned_board(&self.board_id).await?;

            let id = match &self.id {
                Some(id) => {
                    let taken = store.column_path(id).exists();
                    execution::check_client_id("id", id.as_str(), ColumnId::PREFIX, taken)?;
                    id.clone()
                }
                None => ColumnId::new(),
            };

            let columns = store.read_columns(&board.id).await?;
            let column = Column {
                id,
                name,
                order: order::append(columns.iter().map(|c| c.order)),
                board_id: board.id.clone(),
            };
            store.write_column(&column).await?;
            store.invalidate(&board.id).await?;

            tracing::debug!(column = %column.id, order = column.order, "column appended");
            Ok(Applied::new(board.id, serde_json::to_value(&column)?))
        }
        .await;

        execution::logged(self, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::context::BoardStore;
    use crate::types::Session;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, BoardContext, String) {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(BoardStore::new(temp.path().join(".trellis")));
        let ctx = store.session(Session::new("usr_owner"));
        let board = CreateBoard::new("Roadmap", "#000000").execute(&ctx).await.into_result().unwrap();
        let id = board["id"].as_str().unwrap().to_string();
        (temp, ctx, id)
    }

    #[tokio::test]
    async fn test_columns_append_in_order() {
        let (_temp, ctx, board) = setup().await;

        let first = AddColumn::new(board.as_str(), "Todo").execute(&ctx).await.into_result().unwrap();
        let second = AddColumn::new(board.as_str(), "Done").execute(&ctx).await.into_result().unwrap();

        assert_eq!(first["order"], 1.0);
        assert_eq!(second["order"], 2.0);
        assert!(first["id"].as_str().unwrap().starts_with("col_"));
    }

    #[tokio::test]
    async fn test_client_supplied_id() {
        let (_temp, ctx, board) = setup().await;

        let value = AddColumn::new(board.as_str(), "Todo")
            .with_id("col_client1")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["id"], "col_client1");

        let reused = AddColumn::new(board.as_str(), "Again")
            .with_id("col_client1")
            .execute(&ctx)
            .await;
        assert!(matches!(reused.into_result(), Err(BoardError::InvalidValue { .. })));

        let wrong_prefix = AddColumn::new(board.as_str(), "Odd")
            .with_id("itm_client2")
            .execute(&ctx)
            .await;
        assert!(matches!(wrong_prefix.into_result(), Err(BoardError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_add_column_to_missing_board() {
        let (_temp, ctx, _board) = setup().await;
        let result = AddColumn::new("brd_missing", "Todo").execute(&ctx).await;
        assert!(matches!(result.into_result(), Err(BoardError::BoardNotFound { .. })));
    }
}
