//! UpdateBoard command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::execution::{self, Applied};
use crate::types::{Board, BoardId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use trellis_operations::{async_trait, operation, Execute, ExecutionResult};

/// Rename and/or recolor a board
#[operation(verb = "update", noun = "board", description = "Rename or recolor a board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateBoard {
    /// The board ID
    pub id: BoardId,
    /// New name
    #[param(short = 'n')]
    pub name: Option<String>,
    /// New color, #rrggbb
    #[param(short = 'c')]
    pub color: Option<String>,
}

impl UpdateBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            color: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for UpdateBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result: Result<Applied> = async {
            if self.name.is_none() && self.color.is_none() {
                return Err(BoardError::invalid_value("name", "nothing to update"));
            }

            let store = ctx.store();
            let _lock = store.lock_with_timeout().await?;
            let mut board = ctx.owned_board(&self.id).await?;

            if let Some(color) = &self.color {
                if !Board::is_valid_color(color) {
                    return Err(BoardError::invalid_value(
                        "color",
                        format!("expected #rrggbb, got {:?}", color),
                    ));
                }
                board.color = color.clone();
            }

            if let Some(name) = &self.name {
                let name = execution::required_text("name", name)?;
                let taken = store
                    .read_boards_owned_by(ctx.user())
                    .await?
                    .iter()
                    .any(|b| b.name == name && b.id != board.id);
                if taken {
                    return Err(BoardError::DuplicateName { name });
                }
                board.name = name;
            }

            store.write_board(&board).await?;
            store.invalidate(&board.id).await?;

            Ok(Applied::new(board.id.clone(), serde_json::to_value(&board)?))
        }
        .await;

        execution::logged(self, start, result)
    }
}
