//! CreateBoard command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::execution::{self, Applied};
use crate::types::Board;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use trellis_operations::{async_trait, operation, Execute, ExecutionResult};

/// Create a board owned by the session user
#[operation(
    verb = "create",
    noun = "board",
    description = "Create a board owned by the session user"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateBoard {
    /// Board name, unique among the user's boards
    #[param(short = 'n')]
    pub name: String,
    /// Six-digit hex color, e.g. #3b82f6
    #[param(short = 'c')]
    pub color: String,
}

impl CreateBoard {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for CreateBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result: Result<Applied> = async {
            let name = execution::required_text("name", &self.name)?;
            if !Board::is_valid_color(&self.color) {
                return Err(BoardError::invalid_value(
                    "color",
                    format!("expected #rrggbb, got {:?}", self.color),
                ));
            }

            let store = ctx.store();
            store.ensure_directories().await?;
            let _lock = store.lock_with_timeout().await?;

            let owned = store.read_boards_owned_by(ctx.user()).await?;
            if owned.iter().any(|b| b.name == name) {
                return Err(BoardError::DuplicateName { name });
            }

            let board = Board::new(name, self.color.as_str(), ctx.user().clone());
            store.write_board(&board).await?;

            Ok(Applied::new(board.id.clone(), serde_json::to_value(&board)?))
        }
        .await;

        execution::logged(self, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BoardStore;
    use crate::types::Session;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn setup() -> (TempDir, BoardContext) {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(BoardStore::new(temp.path().join(".trellis")));
        let ctx = store.session(Session::new("usr_owner"));
        (temp, ctx)
    }

    #[tokio::test]
    async fn test_create_board() {
        let (_temp, ctx) = setup();

        let result = CreateBoard::new("  Roadmap ", "#3b82f6").execute(&ctx).await;
        assert!(result.log_entry().is_some());

        let value = result.into_result().unwrap();
        assert_eq!(value["name"], "Roadmap");
        assert_eq!(value["owner_id"], "usr_owner");
        assert!(value["id"].as_str().unwrap().starts_with("brd_"));
    }

    #[tokio::test]
    async fn test_invalid_color_rejected() {
        let (_temp, ctx) = setup();

        let result = CreateBoard::new("Roadmap", "blue").execute(&ctx).await;
        assert!(result.is_failed());
        assert!(matches!(
            result.into_result(),
            Err(BoardError::InvalidValue { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_name_per_owner() {
        let (_temp, ctx) = setup();
        CreateBoard::new("Roadmap", "#000000")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let again = CreateBoard::new("Roadmap", "#ffffff").execute(&ctx).await;
        assert!(matches!(
            again.into_result(),
            Err(BoardError::DuplicateName { .. })
        ));

        // another owner may reuse the name
        let other = BoardContext::new(Arc::new(BoardStore::new(ctx.store().root())), Session::new("usr_other"));
        assert!(CreateBoard::new("Roadmap", "#ffffff")
            .execute(&other)
            .await
            .into_result()
            .is_ok());
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let (_temp, ctx) = setup();
        let result = CreateBoard::new("   ", "#000000").execute(&ctx).await;
        assert!(matches!(
            result.into_result(),
            Err(BoardError::InvalidValue { .. })
        ));
    }
}
