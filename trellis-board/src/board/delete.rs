//! DeleteBoard command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::execution::{self, Applied};
use crate::types::BoardId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use trellis_operations::{async_trait, operation, Execute, ExecutionResult};

/// Delete a board with all of its columns and cards
#[operation(
    verb = "delete",
    noun = "board",
    description = "Delete a board with its columns and cards"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteBoard {
    /// The board ID to delete
    pub id: BoardId,
}

impl DeleteBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for DeleteBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result: Result<Applied> = async {
            let store = ctx.store();
            let _lock = store.lock_with_timeout().await?;
            let board = ctx.owned_board(&self.id).await?;

            let cards = store.read_cards(&board.id).await?;
            for card in &cards {
                store.delete_card_file(&card.id).await?;
            }
            let columns = store.read_columns(&board.id).await?;
            for column in &columns {
                store.delete_column_file(&column.id).await?;
            }
            store.delete_board_file(&board.id).await?;
            store.invalidate(&board.id).await?;

            Ok(Applied::new(
                board.id.clone(),
                serde_json::json!({
                    "deleted": true,
                    "id": board.id,
                    "columns": columns.len(),
                    "cards": cards.len(),
                }),
            ))
        }
        .await;

        execution::logged(self, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CreateBoard, ListBoards};
    use crate::card::AddCard;
    use crate::column::AddColumn;
    use crate::context::BoardStore;
    use crate::types::Session;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_delete_board_cascades() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(BoardStore::new(temp.path().join(".trellis")));
        let ctx = store.session(Session::new("usr_owner"));

        let board = CreateBoard::new("Doomed", "#000000").execute(&ctx).await.into_result().unwrap();
        let board_id = board["id"].as_str().unwrap();
        let column = AddColumn::new(board_id, "Todo").execute(&ctx).await.into_result().unwrap();
        AddCard::new(column["id"].as_str().unwrap(), "task")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let value = DeleteBoard::new(board_id).execute(&ctx).await.into_result().unwrap();
        assert_eq!(value["deleted"], true);
        assert_eq!(value["columns"], 1);
        assert_eq!(value["cards"], 1);

        let id = BoardId::from_string(board_id);
        assert!(store.read_columns(&id).await.unwrap().is_empty());
        assert!(store.read_cards(&id).await.unwrap().is_empty());
        let listed = ListBoards::new().execute(&ctx).await.into_result().unwrap();
        assert_eq!(listed["count"], 0);
    }

    #[tokio::test]
    async fn test_delete_board_forbidden() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(BoardStore::new(temp.path().join(".trellis")));
        let owner = store.session(Session::new("usr_owner"));
        let other = store.session(Session::new("usr_other"));

        let board = CreateBoard::new("Kept", "#000000").execute(&owner).await.into_result().unwrap();
        let board_id = board["id"].as_str().unwrap();

        let result = DeleteBoard::new(board_id).execute(&other).await;
        assert!(matches!(result.into_result(), Err(BoardError::Forbidden { .. })));
        assert!(store.read_board(&BoardId::from_string(board_id)).await.is_ok());
    }
}
