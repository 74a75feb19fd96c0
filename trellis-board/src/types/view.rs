//! The read view of one board: its metadata, columns and cards

use super::{Board, Card, CardId, Column, ColumnId};
use crate::scope::{self, Ordered};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of a board as read from the store.
///
/// Cards are keyed by id; relative position comes only from comparing order
/// keys at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub board: Board,
    pub columns: Vec<Column>,
    pub cards: BTreeMap<CardId, Card>,
}

/// A column together with its cards, both in display order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lane {
    #[serde(flatten)]
    pub column: Column,
    pub cards: Vec<Card>,
}

impl BoardView {
    pub fn new(board: Board, mut columns: Vec<Column>, cards: Vec<Card>) -> Self {
        scope::sort(&mut columns);
        Self {
            board,
            columns,
            cards: cards.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    /// Columns in display order
    pub fn sorted_columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by(|a, b| scope::compare(*a, *b));
        columns
    }

    /// Cards of one column in display order
    pub fn cards_in(&self, column: &ColumnId) -> Vec<&Card> {
        scope::members(self.cards.values(), column)
    }

    /// Columns with their cards. Cards whose column is missing are left out.
    pub fn lanes(&self) -> Vec<Lane> {
        self.sorted_columns()
            .into_iter()
            .map(|column| Lane {
                column: column.clone(),
                cards: self.cards_in(column.id()).into_iter().cloned().collect(),
            })
            .collect()
    }

    /// JSON shape returned to callers: board fields plus ordered lanes
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.board.id,
            "name": self.board.name,
            "color": self.board.color,
            "owner_id": self.board.owner_id,
            "columns": self.lanes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoardId, UserId};

    fn view() -> BoardView {
        let board = Board::new("Roadmap", "#112233", UserId::from_string("usr_a"));
        let todo = Column::new("Todo", 2.0, board.id.clone());
        let done = Column::new("Done", 1.0, board.id.clone());
        let cards = vec![
            Card::new("second", 2.0, todo.id.clone(), board.id.clone()),
            Card::new("first", 1.0, todo.id.clone(), board.id.clone()),
            Card::new("shipped", 1.0, done.id.clone(), board.id.clone()),
            Card::new("orphan", 1.0, ColumnId::from_string("col_gone"), BoardId::from_string("x")),
        ];
        BoardView::new(board, vec![todo, done], cards)
    }

    #[test]
    fn test_lanes_are_sorted() {
        let view = view();
        let lanes = view.lanes();
        assert_eq!(lanes.len(), 2);
        assert_eq!(lanes[0].column.name, "Done");
        assert_eq!(lanes[1].column.name, "Todo");
        let titles: Vec<&str> = lanes[1].cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn test_orphans_are_skipped() {
        let view = view();
        let total: usize = view.lanes().iter().map(|l| l.cards.len()).sum();
        assert_eq!(total, 3);
        assert_eq!(view.cards.len(), 4);
    }

    #[test]
    fn test_json_shape() {
        let json = view().to_json();
        assert_eq!(json["name"], "Roadmap");
        assert_eq!(json["columns"][1]["name"], "Todo");
        assert_eq!(json["columns"][1]["cards"][0]["title"], "first");
    }
}
