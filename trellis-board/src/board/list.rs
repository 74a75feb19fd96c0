//! ListBoards command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::execution;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_operations::{async_trait, operation, Execute, ExecutionResult};

/// List the session user's boards
#[operation(verb = "list", noun = "board", description = "List boards owned by the session user")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListBoards {}

impl ListBoards {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ListBoards {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let result: Result<Value> = async {
            let boards = ctx.store().read_boards_owned_by(ctx.user()).await?;
            tracing::debug!(user = %ctx.user(), count = boards.len(), "listed boards");
            Ok(serde_json::json!({
                "boards": boards,
                "count": boards.len(),
            }))
        }
        .await;

        execution::unlogged(result)
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

    #[tokio::test]
    async fn test_list_only_own_boards_sorted_by_name() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(BoardStore::new(temp.path().join(".trellis")));
        let alice = store.session(Session::new("usr_alice"));
        let bob = store.session(Session::new("usr_bob"));

        for name in ["Zeta", "Alpha"] {
            CreateBoard::new(name, "#000000").execute(&alice).await.into_result().unwrap();
        }
        CreateBoard::new("Bob's", "#000000").execute(&bob).await.into_result().unwrap();

        let result = ListBoards::new().execute(&alice).await;
        assert!(result.log_entry().is_none());

        let value = result.into_result().unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["boards"][0]["name"], "Alpha");
        assert_eq!(value["boards"][1]["name"], "Zeta");
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(BoardStore::new(temp.path().join(".trellis")));
        let ctx = store.session(Session::new("usr_alice"));

        let value = ListBoards::new().execute(&ctx).await.into_result().unwrap();
        assert_eq!(value["count"], 0);
    }
}
