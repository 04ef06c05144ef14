//! Heap algorithms shared by both queues.
//!
//! They know nothing about where positions are tracked:
//! every move goes through [`SiftTarget::swap`] which must keep
//! the position bookkeeping of the queue consistent.

use std::cmp::Ordering;

/// Array of prioritized slots which can be reordered into binary heap.
pub(crate) trait SiftTarget {
    fn len(&self) -> usize;

    /// Compares priorities stored in slots `a` and `b` using queue comparator.
    fn compare(&self, a: usize, b: usize) -> Ordering;

    /// Exchanges slots together with their position bookkeeping.
    fn swap(&mut self, a: usize, b: usize);
}

#[inline(always)]
fn parent_of(position: usize) -> usize {
    (position - 1) / 2
}

/// Child which must be closer to the root of both children of `position`.
/// Right child is chosen only if it strictly precedes the left one.
#[inline(always)]
fn leading_child<H: SiftTarget + ?Sized>(target: &H, position: usize) -> Option<usize> {
    let len = target.len();
    let left = position * 2 + 1;
    if left >= len {
        return None;
    }
    let right = left + 1;
    if right < len && target.compare(right, left) == Ordering::Less {
        Some(right)
    } else {
        Some(left)
    }
}

/// Moves slot to the root while it precedes its parent.
/// Returns final position of moved item.
pub(crate) fn sift_up<H: SiftTarget + ?Sized>(target: &mut H, position: usize) -> usize {
    debug_assert!(position < target.len(), "Out of index in sift_up");
    let mut position = position;
    while position > 0 {
        let parent_pos = parent_of(position);
        if target.compare(position, parent_pos) == Ordering::Less {
            target.swap(position, parent_pos);
            position = parent_pos;
        } else {
            break;
        }
    }
    position
}

/// Moves slot to the leaves while some child precedes it.
/// Stops early if the slot ties with its leading child.
/// Returns final position of moved item.
pub(crate) fn sift_down<H: SiftTarget + ?Sized>(target: &mut H, position: usize) -> usize {
    debug_assert!(position < target.len(), "Out of index in sift_down");
    let mut position = position;
    while let Some(child) = leading_child(target, position) {
        if target.compare(position, child) != Ordering::Greater {
            break;
        }
        target.swap(position, child);
        position = child;
    }
    position
}

/// Floyd's variant of sift down used after removal of root.
///
/// Item is moved to the leaf without comparing it with children,
/// then sifted up once. Promoted last item usually belongs near the bottom
/// so this needs fewer comparisons than [`sift_down`].
pub(crate) fn sift_down_to_leaf<H: SiftTarget + ?Sized>(target: &mut H, position: usize) -> usize {
    debug_assert!(position < target.len(), "Out of index in sift_down_to_leaf");
    let mut position = position;
    while let Some(child) = leading_child(target, position) {
        target.swap(position, child);
        position = child;
    }
    sift_up(target, position)
}

/// Restores heap property at the slot which could be violated in any direction,
/// e.g. after moving last item into the hole left by removal.
pub(crate) fn sift_both<H: SiftTarget + ?Sized>(target: &mut H, position: usize) -> usize {
    let position = sift_up(target, position);
    sift_down(target, position)
}

/// Builds heap from arbitrary array in O(n).
pub(crate) fn heapify<H: SiftTarget + ?Sized>(target: &mut H) {
    for position in (0..target.len() / 2).rev() {
        sift_down(target, position);
    }
}

pub(crate) fn is_heap<H: SiftTarget + ?Sized>(target: &H) -> bool {
    (1..target.len()).all(|i| target.compare(parent_of(i), i) != Ordering::Greater)
}
