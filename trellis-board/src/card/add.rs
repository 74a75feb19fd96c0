//! AddCard command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::execution::{self, Applied};
use crate::order;
use crate::types::{Card, CardId, ColumnId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use trellis_operations::{async_trait, operation, Execute, ExecutionResult};

/// Append a card at the bottom of a column
#[operation(
    verb = "add",
    noun = "card",
    description = "Append a card to the bottom of a column"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddCard {
    /// The column to append to
    #[param(short = 'c')]
    pub column_id: ColumnId,
    /// Card title
    #[param(short = 't')]
    pub title: String,
    /// Card body
    pub content: Option<String>,
    /// Client-generated card ID (itm_...), generated when absent
    pub id: Option<CardId>,
}

impl AddCard {
    pub fn new(column_id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            title: title.into(),
            content: None,
            id: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Use an id generated by the client, e.g. for an optimistic insert
    pub fn with_id(mut self, id: impl Into<CardId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for AddCard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result: Result<Applied> = async {
            let title = execution::required_text("title", &self.title)?;

            let store = ctx.store();
            let _lock = store.lock_with_timeout().await?;
            let (board, column) = ctx.owned_column(&self.column_id).await?;

            let id = match &self.id {
                Some(id) => {
                    let taken = store.card_path(id).exists();
                    execution::check_client_id("id", id.as_str(), CardId::PREFIX, taken)?;
                    id.clone()
                }
                None => CardId::new(),
            };

            let siblings = store.read_cards_in_column(&column.id).await?;
            let card = Card {
                id,
                title,
                content: self.content.clone(),
                order: order::append(siblings.iter().map(|c| c.order)),
                column_id: column.id,
                board_id: board.id.clone(),
            };
            store.write_card(&card).await?;
            store.invalidate(&board.id).await?;

            tracing::debug!(card = %card.id, order = card.order, "card appended");
            Ok(Applied::new(board.id, serde_json::to_value(&card)?))
        }
        .await;

        execution::logged(self, start, result)
    }
}
