//! MoveCard command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::execution::{self, Applied};
use crate::relocate;
use crate::types::{CardId, ColumnId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use trellis_operations::{async_trait, operation, Execute, ExecutionResult};

/// Move a card within its column or into another column of the same board.
///
/// The new order key is computed from the neighbors currently stored, under
/// the store lock, and written together with the column in one file write.
#[operation(
    verb = "move",
    noun = "card",
    description = "Move a card to a column, between two neighbors"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveCard {
    /// The card ID to move
    pub id: CardId,
    /// Target column
    #[param(short = 'c')]
    pub column_id: ColumnId,
    /// Card the moved one should follow
    pub before: Option<CardId>,
    /// Card the moved one should precede
    pub after: Option<CardId>,
}

impl MoveCard {
    /// Move to the bottom of `column_id`
    pub fn new(id: impl Into<CardId>, column_id: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            column_id: column_id.into(),
            before: None,
            after: None,
        }
    }

    pub fn before(mut self, neighbor: impl Into<CardId>) -> Self {
        self.before = Some(neighbor.into());
        self
    }

    pub fn after(mut self, neighbor: impl Into<CardId>) -> Self {
        self.after = Some(neighbor.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for MoveCard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result: Result<Applied> = async {
            let store = ctx.store();
            let _lock = store.lock_with_timeout().await?;
            let (board, card) = ctx.owned_card(&self.id).await?;
            let (_, target) = ctx.owned_column(&self.column_id).await?;

            if target.board_id != board.id {
                return Err(BoardError::invalid_value(
                    "column_id",
                    format!("{} belongs to another board", target.id),
                ));
            }

            let siblings = store.read_cards_in_column(&target.id).await?;
            let plan = relocate::plan_move(
                store.allocator(),
                card,
                &target.id,
                siblings,
                self.before.as_ref(),
                self.after.as_ref(),
            )?;

            let persisted = relocate::persist(&plan, move |card| store.write_card(card)).await;
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
