//! GetBoard command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::execution;
use crate::types::BoardId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_operations::{async_trait, operation, Execute, ExecutionResult};

/// Read a board with its columns and cards in display order
#[operation(
    verb = "get",
    noun = "board",
    description = "Show a board with its columns and cards in order"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetBoard {
    /// The board ID
    pub id: BoardId,
}

impl GetBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for GetBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let result: Result<Value> = async {
            let view = ctx.store().read_view(&self.id).await?;
            if !view.board.is_owned_by(ctx.user()) {
                return Err(BoardError::forbidden(ctx.user(), &self.id));
            }
            Ok(view.to_json())
        }
        .await;

        execution::unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::card::AddCard;
    use crate::column::AddColumn;
    use crate::context::BoardStore;
    use crate::types::Session;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_board_view() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(BoardStore::new(temp.path().join(".trellis")));
        let ctx = store.session(Session::new("usr_owner"));

        let board = CreateBoard::new("Roadmap", "#3b82f6").execute(&ctx).await.into_result().unwrap();
        let board_id = board["id"].as_str().unwrap();
        let column = AddColumn::new(board_id, "Todo").execute(&ctx).await.into_result().unwrap();
        let column_id = column["id"].as_str().unwrap();
        for title in ["first", "second"] {
            AddCard::new(column_id, title).execute(&ctx).await.into_result().unwrap();
        }

        let view = GetBoard::new(board_id).execute(&ctx).await.into_result().unwrap();
        assert_eq!(view["name"], "Roadmap");
        assert_eq!(view["columns"][0]["name"], "Todo");
        assert_eq!(view["columns"][0]["cards"][0]["title"], "first");
        assert_eq!(view["columns"][0]["cards"][1]["title"], "second");
        assert!(store.is_cached(&BoardId::from_string(board_id)).await);
    }

    #[tokio::test]
    async fn test_get_board_forbidden_for_other_user() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(BoardStore::new(temp.path().join(".trellis")));
        let owner = store.session(Session::new("usr_owner"));
        let other = store.session(Session::new("usr_other"));

        let board = CreateBoard::new("Private", "#000000").execute(&owner).await.into_result().unwrap();
        let result = GetBoard::new(board["id"].as_str().unwrap()).execute(&other).await;
        assert!(matches!(result.into_result(), Err(BoardError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_get_missing_board() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(BoardStore::new(temp.path().join(".trellis")));
        let ctx = store.session(Session::new("usr_owner"));

        let result = GetBoard::new("brd_missing").execute(&ctx).await;
        assert!(matches!(result.into_result(), Err(BoardError::BoardNotFound { .. })));
    }
}
