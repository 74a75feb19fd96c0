//! DeleteCard command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::execution::{self, Applied};
use crate::types::CardId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use trellis_operations::{async_trait, operation, Execute, ExecutionResult};

/// Delete a card. Its siblings keep their order keys.
#[operation(verb = "delete", noun = "card", description = "Delete a card")]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteCard {
    /// The card ID to delete
    pub id: CardId,
}

impl DeleteCard {
    pub fn new(id: impl Into<CardId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for DeleteCard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result: Result<Applied> = async {
            let store = ctx.store();
            let _lock = store.lock_with_timeout().await?;
            let (board, card) = ctx.owned_card(&self.id).await?;

            store.delete_card_file(&card.id).await?;
            store.invalidate(&board.id).await?;

            Ok(Applied::new(
                board.id,
                serde_json::json!({
                    "deleted": true,
                    "id": card.id,
                }),
            ))
        }
        .await;

        execution::logged(self, start, result)
    }
}
