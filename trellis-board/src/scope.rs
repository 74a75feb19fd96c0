//! Ordered scopes: sorting elements and finding the neighbors of a drop point.

use crate::error::{BoardError, Result};
use std::cmp::Ordering;
use std::fmt::Display;

/// An element with a position inside a parent scope
pub trait Ordered {
    type Id: Clone + Eq + Ord + Display;
    type ParentId: Clone + Eq + Display;

    fn id(&self) -> &Self::Id;
    fn order(&self) -> f64;
    fn set_order(&mut self, order: f64);
    fn parent_id(&self) -> &Self::ParentId;
    fn set_parent_id(&mut self, parent: Self::ParentId);
}

/// Display ordering: order key ascending, ties broken by id
pub fn compare<T: Ordered>(a: &T, b: &T) -> Ordering {
    a.order()
        .total_cmp(&b.order())
        .then_with(|| a.id().cmp(b.id()))
}

/// Sort elements into display order in place
pub fn sort<T: Ordered>(elements: &mut [T]) {
    elements.sort_by(compare);
}

/// Members of `scope`, in display order
pub fn members<'a, T, I>(elements: I, scope: &T::ParentId) -> Vec<&'a T>
where
    T: Ordered + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut members: Vec<&T> = elements
        .into_iter()
        .filter(|e| e.parent_id() == scope)
        .collect();
    members.sort_by(|a, b| compare(*a, *b));
    members
}

/// The gap a moved element drops into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Index in the target sequence (without the moved element) the element
    /// takes once inserted
    pub index: usize,
    pub before: Option<f64>,
    pub after: Option<f64>,
}

/// Resolve the drop point described by optional neighbor ids into the pair
/// of adjacent neighbors it sits between.
///
/// `sequence` is the target scope in display order with the moved element
/// already removed.
///
/// - only `before`: the element goes right after it
/// - only `after`: the element goes right before it
/// - both: they must be adjacent
/// - neither: the tail (or `1` for an empty scope)
pub fn resolve_slot<T: Ordered>(
    sequence: &[&T],
    before: Option<&T::Id>,
    after: Option<&T::Id>,
) -> Result<Slot> {
    let position = |field: &str, id: &T::Id| {
        sequence
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| {
                BoardError::invalid_value(field, format!("{} is not in the target scope", id))
            })
    };
    let order_at = |index: usize| sequence.get(index).map(|e| e.order());

    let before_index = before.map(|id| position("before", id)).transpose()?;
    let after_index = after.map(|id| position("after", id)).transpose()?;

    let slot = match (before_index, after_index) {
        (Some(b), Some(a)) => {
            if a != b + 1 {
                return Err(BoardError::invalid_value(
                    "after",
                    "neighbors are not adjacent in the target scope",
                ));
            }
            Slot {
                index: a,
                before: order_at(b),
                after: order_at(a),
            }
        }
        (Some(b), None) => Slot {
            index: b + 1,
            before: order_at(b),
            after: order_at(b + 1),
        },
        (None, Some(a)) => Slot {
            index: a,
            before: a.checked_sub(1).and_then(order_at),
            after: order_at(a),
        },
        (None, None) => Slot {
            index: sequence.len(),
            before: sequence.last().map(|e| e.order()),
            after: None,
        },
    };
    Ok(slot)
}
