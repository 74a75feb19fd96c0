//! Board-level types: Board, Column

use super::ids::{BoardId, ColumnId, UserId};
use crate::scope::Ordered;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("color pattern compiles"));

/// A board owned by one user. Columns and cards are stored as their own files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    /// `#rrggbb`
    pub color: String,
    pub owner_id: UserId,
}

impl Board {
    pub fn new(name: impl Into<String>, color: impl Into<String>, owner_id: UserId) -> Self {
        Self {
            id: BoardId::new(),
            name: name.into(),
            color: color.into(),
            owner_id,
        }
    }

    /// Whether `color` is a six-digit hex color such as `#3b82f6`
    pub fn is_valid_color(color: &str) -> bool {
        COLOR_RE.is_match(color)
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }
}

/// A column: an ordered element scoped by its board, and the scope of its cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub order: f64,
    pub board_id: BoardId,
}

impl Column {
    pub fn new(name: impl Into<String>, order: f64, board_id: BoardId) -> Self {
        Self {
            id: ColumnId::new(),
            name: name.into(),
            order,
            board_id,
        }
    }
}

impl Ordered for Column {
    type Id = ColumnId;
    type ParentId = BoardId;

    fn id(&self) -> &ColumnId {
        &self.id
    }

    fn order(&self) -> f64 {
        self.order
    }

    fn set_order(&mut self, order: f64) {
        self.order = order;
    }

    fn parent_id(&self) -> &BoardId {
        &self.board_id
    }

    fn set_parent_id(&mut self, parent: BoardId) {
        self.board_id = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_validation() {
        assert!(Board::is_valid_color("#3b82f6"));
        assert!(Board::is_valid_color("#ABCDEF"));
        assert!(!Board::is_valid_color("3b82f6"));
        assert!(!Board::is_valid_color("#3b82f"));
        assert!(!Board::is_valid_color("#3b82fg"));
        assert!(!Board::is_valid_color("#3b82f6 "));
    }

    #[test]
    fn test_ownership() {
        let owner = UserId::from_string("usr_a");
        let board = Board::new("Roadmap", "#000000", owner.clone());
        assert!(board.is_owned_by(&owner));
        assert!(!board.is_owned_by(&UserId::from_string("usr_b")));
    }
}
