//! UpdateColumn command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::execution::{self, Applied};
use crate::types::ColumnId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use trellis_operations::{async_trait, operation, Execute, ExecutionResult};

/// Rename a column
#[operation(verb = "update", noun = "column", description = "Rename a column")]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateColumn {
    /// The column ID
    pub id: ColumnId,
    /// New display name
    #[param(short = 'n')]
    pub name: String,
}

impl UpdateColumn {
    pub fn new(id: impl Into<ColumnId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for UpdateColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result: Result<Applied> = async {
            let name = execution::required_text("name", &self.name)?;

            let store = ctx.store();
            let _lock = store.lock_with_timeout().await?;
            let (board, mut column) = ctx.owned_column(&self.id).await?;

            column.name = name;
            store.write_column(&column).await?;
            store.invalidate(&board.id).await?;

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
    use crate::column::AddColumn;
    use crate::context::BoardStore;
    use crate::types::Session;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_rename_column_keeps_order() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(BoardStore::new(temp.path().join(".trellis")));
        let ctx = store.session(Session::new("usr_owner"));
        let board = CreateBoard::new("Roadmap", "#000000").execute(&ctx).await.into_result().unwrap();
        let column = AddColumn::new(board["id"].as_str().unwrap(), "Todo")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let value = UpdateColumn::new(column["id"].as_str().unwrap(), "Backlog")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["name"], "Backlog");
        assert_eq!(value["order"], column["order"]);
    }

    #[tokio::test]
    async fn test_rename_missing_column() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(BoardStore::new(temp.path().join(".trellis")));
        let ctx = store.session(Session::new("usr_owner"));

        let result = UpdateColumn::new("col_missing", "x").execute(&ctx).await;
        assert!(matches!(result.into_result(), Err(BoardError::ColumnNotFound { .. })));
    }
}
