//! DeleteColumn command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::execution::{self, Applied};
use crate::types::ColumnId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use trellis_operations::{async_trait, operation, Execute, ExecutionResult};

/// Delete a column and its cards. Remaining columns keep their order keys.
#[operation(
    verb = "delete",
    noun = "column",
    description = "Delete a column together with its cards"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteColumn {
    /// The column ID to delete
    pub id: ColumnId,
}

impl DeleteColumn {
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for DeleteColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result: Result<Applied> = async {
            let store = ctx.store();
            let _lock = store.lock_with_timeout().await?;
            let (board, column) = ctx.owned_column(&self.id).await?;

            let cards = store.read_cards_in_column(&column.id).await?;
            for card in &cards {
                store.delete_card_file(&card.id).await?;
            }
            store.delete_column_file(&column.id).await?;
            store.invalidate(&board.id).await?;

            Ok(Applied::new(
                board.id,
                serde_json::json!({
                    "deleted": true,
                    "id": column.id,
                    "cards": cards.len(),
                }),
            ))
        }
        .await;

        execution::logged(self, start, result)
    }
}
