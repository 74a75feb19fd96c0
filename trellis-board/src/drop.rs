//! Drag-and-drop hit testing.
//!
//! A drop over a row lands before it when the pointer is at or above the
//! row's vertical midpoint, after it otherwise. The result is expressed as
//! neighbor ids so it can be handed straight to a move command.

use crate::scope::Ordered;
use serde::{Deserialize, Serialize};

/// Which half of a row the pointer is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropEdge {
    Top,
    Bottom,
}

impl DropEdge {
    /// Compare the pointer against the midpoint of the row's bounding box
    pub fn hit_test(pointer_y: f64, row_top: f64, row_bottom: f64) -> Self {
        let midpoint = (row_top + row_bottom) / 2.0;
        if pointer_y <= midpoint {
            Self::Top
        } else {
            Self::Bottom
        }
    }
}

/// Neighbor ids around a drop point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget<I> {
    pub before: Option<I>,
    pub after: Option<I>,
}

impl<I> DropTarget<I> {
    /// Drop onto an empty collection
    pub fn empty() -> Self {
        Self {
            before: None,
            after: None,
        }
    }
}

impl<I: Clone + Eq> DropTarget<I> {
    /// Neighbors for a drop on `edge` of the row at `row_index` of
    /// `sequence` (display order, as rendered, including the dragged
    /// element). The dragged element never counts as its own neighbor.
    pub fn resolve<T>(sequence: &[T], row_index: usize, edge: DropEdge, moving: &I) -> Self
    where
        T: Ordered<Id = I>,
    {
        let others: Vec<&T> = sequence.iter().filter(|e| e.id() != moving).collect();
        if others.is_empty() {
            return Self::empty();
        }

        // Map the rendered row onto the sequence without the dragged element.
        let row = sequence.get(row_index);
        let Some(row) = row.filter(|r| r.id() != moving) else {
            // Hovering the dragged element itself keeps it where it is.
            let prior = sequence[..row_index.min(sequence.len())]
                .iter()
                .filter(|e| e.id() != moving)
                .count();
            return Self::around(&others, prior);
        };

        let index = others
            .iter()
            .position(|e| e.id() == row.id())
            .unwrap_or(others.len());
        match edge {
            DropEdge::Top => Self::around(&others, index),
            DropEdge::Bottom => Self::around(&others, index + 1),
        }
    }

    /// Neighbors of the gap at `index` in `others`
    fn around<T: Ordered<Id = I>>(others: &[&T], index: usize) -> Self {
        Self {
            before: index
                .checked_sub(1)
                .and_then(|i| others.get(i))
                .map(|e| e.id().clone()),
            after: others.get(index).map(|e| e.id().clone()),
        }
    }
}
