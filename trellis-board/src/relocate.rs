//! Move planning shared by cards and columns

use crate::error::{BoardError, Result};
use crate::order::{self, OrderAllocator, OrderError, Placement};
use crate::scope::{self, Ordered};
use std::future::Future;

/// Elements to persist for one move
#[derive(Debug)]
pub(crate) struct MovePlan<T> {
    /// Every element whose stored position changes, the moved one included
    pub writes: Vec<T>,
    moved: usize,
    /// The target scope was respaced to `1..=n`
    pub rebalanced: bool,
}

impl<T> MovePlan<T> {
    pub fn moved(&self) -> &T {
        &self.writes[self.moved]
    }

    /// Writes with the moved element last, so an interrupted rebalance
    /// leaves it where it was
    pub fn write_order(&self) -> impl Iterator<Item = &T> {
        let moved = self.moved;
        self.writes
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != moved)
            .map(|(_, element)| element)
            .chain(std::iter::once(self.moved()))
    }
}

/// Persist a plan one element at a time in [`MovePlan::write_order`],
/// stopping at the first failure
pub(crate) async fn persist<'a, T, F, Fut>(plan: &'a MovePlan<T>, mut write: F) -> Result<()>
where
    T: Ordered,
    F: FnMut(&'a T) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut rewritten: Vec<String> = Vec::new();
    for element in plan.write_order() {
        if let Err(error) = write(element).await {
            tracing::error!(
                id = %element.id(),
                ?rewritten,
                %error,
                "move interrupted, scope partially rewritten"
            );
            return Err(error);
        }
        rewritten.push(element.id().to_string());
    }
    Ok(())
}

/// Plan moving `moving` into `target`, between the neighbors named by
/// `before`/`after`.
///
/// `siblings` are the current members of the target scope; the moved element
/// may or may not be among them. When the allocator cannot produce a key
/// between the neighbors (precision exhausted, gap below the threshold, or
/// colliding keys already stored) every member of the target scope is
/// respaced, with the moved element at its intended index.
pub(crate) fn plan_move<T: Ordered>(
    allocator: &OrderAllocator,
    mut moving: T,
    target: &T::ParentId,
    mut siblings: Vec<T>,
    before: Option<&T::Id>,
    after: Option<&T::Id>,
) -> Result<MovePlan<T>> {
    if before == Some(moving.id()) || after == Some(moving.id()) {
        return Err(BoardError::invalid_value(
            "before",
            format!("{} cannot be its own neighbor", moving.id()),
        ));
    }

    siblings.retain(|s| s.id() != moving.id());
    scope::sort(&mut siblings);

    let slot = {
        let sequence: Vec<&T> = siblings.iter().collect();
        scope::resolve_slot(&sequence, before, after)?
    };

    let placement = match allocator.place(slot.before, slot.after) {
        Ok(placement) => placement,
        // sorted neighbors can only be misordered by sharing a key
        Err(OrderError::Misordered { .. }) => Placement::Rebalance,
        Err(e) => return Err(e.into()),
    };

    match placement {
        Placement::Key(_) => {
            let relocation = order::reorder_on_move(&moving, target, slot.before, slot.after);
            tracing::debug!(
                id = %moving.id(),
                scope = %relocation.parent_id,
                order = relocation.order,
                crosses_scope = relocation.crosses_scope,
                "order key allocated"
            );
            moving.set_parent_id(relocation.parent_id);
            moving.set_order(relocation.order);
            Ok(MovePlan {
                writes: vec![moving],
                moved: 0,
                rebalanced: false,
            })
        }
        Placement::Rebalance => {
            tracing::warn!(
                id = %moving.id(),
                scope = %target,
                size = siblings.len() + 1,
                "order keys exhausted, rebalancing scope"
            );
            moving.set_parent_id(target.clone());
            siblings.insert(slot.index, moving);
            order::rebalance(&mut siblings);
            Ok(MovePlan {
                writes: siblings,
                moved: slot.index,
                rebalanced: true,
            })
        }
    }
}
