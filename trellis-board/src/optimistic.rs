//! Optimistic board state.
//!
//! A client applies its own intents to a local snapshot right away, before
//! the store confirms them. When the next authoritative [`BoardView`] arrives
//! it replaces the snapshot wholesale and every pending intent is dropped;
//! no attempt is made to diff or replay.

use crate::order;
use crate::types::{BoardView, Card, CardId, Column, ColumnId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A local edit, mirroring the store commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "kebab-case")]
pub enum Intent {
    AddColumn {
        id: ColumnId,
        name: String,
    },
    DeleteColumn {
        id: ColumnId,
    },
    RenameColumn {
        id: ColumnId,
        name: String,
    },
    AddCard {
        id: CardId,
        column_id: ColumnId,
        title: String,
        order: f64,
    },
    DeleteCard {
        id: CardId,
    },
    MoveCard {
        id: CardId,
        to_column_id: ColumnId,
        order: f64,
    },
    RenameBoard {
        name: String,
    },
}

/// Apply one intent to a snapshot, returning the new snapshot.
///
/// The input is never modified. Intents that name unknown ids return an
/// unchanged copy.
pub fn reduce(view: &BoardView, intent: &Intent) -> BoardView {
    let mut next = view.clone();
    match intent {
        Intent::AddColumn { id, name } => {
            let order = order::append(next.columns.iter().map(|c| c.order));
            next.columns.push(Column {
                id: id.clone(),
                name: name.clone(),
                order,
                board_id: next.board.id.clone(),
            });
        }
        Intent::DeleteColumn { id } => {
            next.columns.retain(|c| &c.id != id);
            next.cards.retain(|_, card| &card.column_id != id);
        }
        Intent::RenameColumn { id, name } => {
            match next.columns.iter_mut().find(|c| &c.id == id) {
                Some(column) => column.name = name.clone(),
                None => tracing::debug!(%id, "rename for unknown column ignored"),
            }
        }
        Intent::AddCard {
            id,
            column_id,
            title,
            order,
        } => {
            next.cards.insert(
                id.clone(),
                Card {
                    id: id.clone(),
                    title: title.clone(),
                    content: None,
                    order: *order,
                    column_id: column_id.clone(),
                    board_id: next.board.id.clone(),
                },
            );
        }
        Intent::DeleteCard { id } => {
            next.cards.remove(id);
        }
        Intent::MoveCard {
            id,
            to_column_id,
            order,
        } => match next.cards.get_mut(id) {
            Some(card) => {
                card.column_id = to_column_id.clone();
                card.order = *order;
            }
            None => tracing::debug!(%id, "move for unknown card ignored"),
        },
        Intent::RenameBoard { name } => next.board.name = name.clone(),
    }
    next
}

/// Confirmed snapshot plus the intents applied on top of it
#[derive(Debug, Clone)]
pub struct OptimisticBoard {
    confirmed: Arc<BoardView>,
    pending: Vec<Intent>,
}

impl OptimisticBoard {
    pub fn new(confirmed: impl Into<Arc<BoardView>>) -> Self {
        Self {
            confirmed: confirmed.into(),
            pending: Vec::new(),
        }
    }

    /// Record a local edit
    pub fn apply(&mut self, intent: Intent) {
        self.pending.push(intent);
    }

    /// What the user sees: pending intents folded over the confirmed snapshot
    pub fn view(&self) -> BoardView {
        self.pending
            .iter()
            .fold((*self.confirmed).clone(), |view, intent| reduce(&view, intent))
    }

    pub fn confirmed(&self) -> &BoardView {
        &self.confirmed
    }

    pub fn pending(&self) -> &[Intent] {
        &self.pending
    }

    /// Replace local state with an authoritative read
    pub fn reconcile(&mut self, authoritative: impl Into<Arc<BoardView>>) {
        self.confirmed = authoritative.into();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Board, UserId};

    fn snapshot() -> BoardView {
        let board = Board::new("Roadmap", "#112233", UserId::from_string("usr_a"));
        let todo = Column::new("Todo", 1.0, board.id.clone());
        let cards = vec![
            Card::new("a", 1.0, todo.id.clone(), board.id.clone()),
            Card::new("b", 2.0, todo.id.clone(), board.id.clone()),
        ];
        BoardView::new(board, vec![todo], cards)
    }

    fn titles(view: &BoardView, column: &ColumnId) -> Vec<String> {
        view.cards_in(column).iter().map(|c| c.title.clone()).collect()
    }

    #[test]
    fn test_reduce_does_not_touch_input() {
        let view = snapshot();
        let before = view.clone();
        let column = view.columns[0].id.clone();
        let next = reduce(&view, &Intent::DeleteColumn { id: column });
        assert_eq!(view, before);
        assert!(next.columns.is_empty());
        assert!(next.cards.is_empty());
    }

    #[test]
    fn test_add_column_appends() {
        let view = snapshot();
        let next = reduce(
            &view,
            &Intent::AddColumn {
                id: ColumnId::from_string("col_new"),
                name: "Doing".into(),
            },
        );
        let added = next.column(&ColumnId::from_string("col_new")).unwrap();
        assert_eq!(added.order, 2.0);
    }

    #[test]
    fn test_move_card_reorders() {
        let view = snapshot();
        let column = view.columns[0].id.clone();
        let b = view.cards_in(&column)[1].id.clone();

        let next = reduce(
            &view,
            &Intent::MoveCard {
                id: b,
                to_column_id: column.clone(),
                order: 0.5,
            },
        );
        assert_eq!(titles(&next, &column), vec!["b", "a"]);
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let view = snapshot();
        let next = reduce(
            &view,
            &Intent::MoveCard {
                id: CardId::from_string("itm_missing"),
                to_column_id: ColumnId::from_string("col_x"),
                order: 3.0,
            },
        );
        assert_eq!(next, view);
    }

    #[test]
    fn test_pending_intents_fold_and_reconcile_discards_them() {
        let view = snapshot();
        let column = view.columns[0].id.clone();
        let mut board = OptimisticBoard::new(view.clone());

        board.apply(Intent::AddCard {
            id: CardId::from_string("itm_c"),
            column_id: column.clone(),
            title: "c".into(),
            order: 3.0,
        });
        board.apply(Intent::RenameBoard { name: "Renamed".into() });

        let shown = board.view();
        assert_eq!(titles(&shown, &column), vec!["a", "b", "c"]);
        assert_eq!(shown.board.name, "Renamed");
        assert_eq!(board.confirmed(), &view);

        board.reconcile(view.clone());
        assert!(board.pending().is_empty());
        assert_eq!(board.view(), view);
    }

    #[test]
    fn test_intent_wire_format() {
        let intent = Intent::DeleteCard {
            id: CardId::from_string("itm_1"),
        };
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["intent"], "delete-card");
        assert_eq!(json["id"], "itm_1");
    }
}
