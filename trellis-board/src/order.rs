//! Order-key allocation for positionally ordered elements.
//!
//! Every card (within a column) and column (within a board) carries an `f64`
//! order key. Display order is the ascending sort of those keys. New elements
//! go to the tail at `max + 1`; a moved element takes the midpoint of its new
//! neighbors, so no sibling is ever renumbered by a plain insert or move.
//!
//! Midpoints run out. With `f64`, inserting repeatedly between a fixed lower
//! bound and the most recently inserted key halves the gap each time; between
//! `1.0` and `2.0` that works 52 times and the 53rd midpoint rounds back to
//! `1.0` (see [`midpoint_capacity`]). [`OrderAllocator::place`] detects that,
//! along with gaps narrower than a configurable threshold, and asks the caller
//! to [`rebalance`] the scope instead.

use crate::scope::Ordered;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order of the first element in an empty scope
pub const FIRST_ORDER: f64 = 1.0;

/// Distance between an appended element and the current tail, and between
/// neighbors after a rebalance
pub const ORDER_STEP: f64 = 1.0;

/// Default neighbor gap below which a rebalance is requested
pub const DEFAULT_MIN_GAP: f64 = 1e-9;

/// Invalid neighbor bounds
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("order bounds must be finite (before: {before:?}, after: {after:?})")]
    NonFinite {
        before: Option<f64>,
        after: Option<f64>,
    },

    #[error("before bound {before} is not below after bound {after}")]
    Misordered { before: f64, after: f64 },
}

/// Order for an element appended to the tail of a scope.
///
/// `max(order) + 1`, or [`FIRST_ORDER`] when the scope is empty.
pub fn append(scope: impl IntoIterator<Item = f64>) -> f64 {
    scope
        .into_iter()
        .reduce(f64::max)
        .map_or(FIRST_ORDER, |max| max + ORDER_STEP)
}

/// Order for an element dropped between two neighbors.
///
/// | before | after | result |
/// |--------|-------|--------|
/// | `Some(a)` | `Some(b)` | `(a + b) / 2` |
/// | `None` | `Some(b)` | `b - 1` |
/// | `Some(a)` | `None` | `a + 1` |
/// | `None` | `None` | `1` |
///
/// Neither neighbor is touched. No check is made that the result actually
/// lands strictly between the bounds; use [`OrderAllocator::place`] for that.
pub fn insert_between(before: Option<f64>, after: Option<f64>) -> f64 {
    match (before, after) {
        (Some(before), Some(after)) => (before + after) / 2.0,
        (None, Some(after)) => after - ORDER_STEP,
        (Some(before), None) => before + ORDER_STEP,
        (None, None) => FIRST_ORDER,
    }
}

/// Where a moved element ends up: its (possibly new) scope and order key.
///
/// Both fields must be persisted together in a single write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relocation<P> {
    pub parent_id: P,
    pub order: f64,
    /// Whether the element leaves its current scope
    pub crosses_scope: bool,
}

/// Compute the new position of `element` when dropped into `target_scope`
/// between neighbors with orders `before` and `after`.
pub fn reorder_on_move<T: Ordered>(
    element: &T,
    target_scope: &T::ParentId,
    before: Option<f64>,
    after: Option<f64>,
) -> Relocation<T::ParentId> {
    Relocation {
        parent_id: target_scope.clone(),
        order: insert_between(before, after),
        crosses_scope: element.parent_id() != target_scope,
    }
}

/// Result of asking the allocator for a key
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// A key strictly between the neighbors
    Key(f64),
    /// No usable key; the scope's orders need to be respaced
    Rebalance,
}

/// Midpoint allocator that notices when `f64` precision runs out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderAllocator {
    /// Neighbor gap below which [`place`](Self::place) asks for a rebalance
    /// even though a midpoint still exists. `0.0` disables the check.
    pub min_gap: f64,
}

impl Default for OrderAllocator {
    fn default() -> Self {
        Self {
            min_gap: DEFAULT_MIN_GAP,
        }
    }
}

impl OrderAllocator {
    pub fn new(min_gap: f64) -> Self {
        Self { min_gap }
    }

    /// Key for a drop between `before` and `after`, or a rebalance request.
    pub fn place(&self, before: Option<f64>, after: Option<f64>) -> Result<Placement, OrderError> {
        if before.is_some_and(|b| !b.is_finite()) || after.is_some_and(|a| !a.is_finite()) {
            return Err(OrderError::NonFinite { before, after });
        }
        if let (Some(before), Some(after)) = (before, after) {
            if before >= after {
                return Err(OrderError::Misordered { before, after });
            }
        }

        let key = insert_between(before, after);
        let degenerate = !key.is_finite()
            || before.is_some_and(|b| key <= b)
            || after.is_some_and(|a| key >= a);
        let narrow = match (before, after) {
            (Some(b), Some(a)) => a - b < self.min_gap,
            _ => false,
        };

        if degenerate || narrow {
            tracing::debug!(?before, ?after, key, degenerate, narrow, "order key needs rebalance");
            Ok(Placement::Rebalance)
        } else {
            Ok(Placement::Key(key))
        }
    }
}

/// Number of successive midpoint insertions that stay distinct when every
/// new key is inserted between `before` and the previously inserted key.
///
/// For `f64` and neighbors `1.0`/`2.0` this is 52.
pub fn midpoint_capacity(before: f64, after: f64) -> usize {
    let mut upper = after;
    let mut count = 0;
    loop {
        let mid = (before + upper) / 2.0;
        if !(mid > before && mid < upper) {
            return count;
        }
        count += 1;
        upper = mid;
    }
}

/// Reassign `1, 2, 3, …` to `sequence` in slice order.
///
/// The slice must already be in the intended display order.
pub fn rebalance<T: Ordered>(sequence: &mut [T]) {
    for (index, element) in sequence.iter_mut().enumerate() {
        element.set_order(FIRST_ORDER + index as f64 * ORDER_STEP);
    }
}

/// Whether any two elements share an order key
pub fn has_collisions<T: Ordered>(elements: &[T]) -> bool {
    let mut orders: Vec<f64> = elements.iter().map(Ordered::order).collect();
    orders.sort_by(f64::total_cmp);
    orders.windows(2).any(|w| w[0] == w[1])
}
