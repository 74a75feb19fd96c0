//! Card type

use super::ids::{BoardId, CardId, ColumnId};
use crate::scope::Ordered;
use serde::{Deserialize, Serialize};

/// A card, ordered within its column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub order: f64,
    pub column_id: ColumnId,
    /// Denormalized so a board's cards can be gathered without walking columns
    pub board_id: BoardId,
}

impl Card {
    pub fn new(title: impl Into<String>, order: f64, column_id: ColumnId, board_id: BoardId) -> Self {
        Self {
            id: CardId::new(),
            title: title.into(),
            content: None,
            order,
            column_id,
            board_id,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

impl Ordered for Card {
    type Id = CardId;
    type ParentId = ColumnId;

    fn id(&self) -> &CardId {
        &self.id
    }

    fn order(&self) -> f64 {
        self.order
    }

    fn set_order(&mut self, order: f64) {
        self.order = order;
    }

    fn parent_id(&self) -> &ColumnId {
        &self.column_id
    }

    fn set_parent_id(&mut self, parent: ColumnId) {
        self.column_id = parent;
    }
}
