//! UpdateCard command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::execution::{self, Applied};
use crate::types::CardId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use trellis_operations::{async_trait, operation, Execute, ExecutionResult};

/// Edit a card's title or content
#[operation(verb = "update", noun = "card", description = "Edit a card's title or content")]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateCard {
    /// The card ID
    pub id: CardId,
    /// New title
    #[param(short = 't')]
    pub title: Option<String>,
    /// New content; an empty string clears it
    pub content: Option<String>,
}

impl UpdateCard {
    pub fn new(id: impl Into<CardId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            content: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for UpdateCard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result: Result<Applied> = async {
            if self.title.is_none() && self.content.is_none() {
                return Err(BoardError::invalid_value("title", "nothing to update"));
            }

            let store = ctx.store();
            let _lock = store.lock_with_timeout().await?;
            let (board, mut card) = ctx.owned_card(&self.id).await?;

            if let Some(title) = &self.title {
                card.title = execution::required_text("title", title)?;
            }
            if let Some(content) = &self.content {
                card.content = Some(content.clone()).filter(|c| !c.is_empty());
            }

            store.write_card(&card).await?;
            store.invalidate(&board.id).await?;

            Ok(Applied::new(board.id, serde_json::to_value(&card)?))
        }
        .await;

        execution::logged(self, start, result)
    }
}
