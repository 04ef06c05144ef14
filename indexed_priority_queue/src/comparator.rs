use std::cmp::{Ord, Ordering};
use std::fmt::Debug;

/// Total preorder over priorities used by both queues.
///
/// [`Ordering::Less`] means that `a` must be dequeued before `b`,
/// so the element ranked lowest by the comparator sits at the root.
///
/// It is logic error if comparator is not a total preorder
/// or if it changes its answers while elements are in queue.
///
/// Any closure `Fn(&P, &P) -> Ordering` is a comparator:
///
/// ```
/// use indexed_priority_queue::{Comparator, HandleHeap};
///
/// // Floats don't implement Ord so we need explicit comparator.
/// let by_float = |a: &f64, b: &f64| a.total_cmp(b);
/// assert_eq!(by_float.compare(&1.0, &2.0), std::cmp::Ordering::Less);
///
/// let mut heap = HandleHeap::with_comparator(by_float);
/// heap.enqueue("second", 2.5);
/// heap.enqueue("first", -0.5);
/// assert_eq!(heap.dequeue(), Some("first"));
/// ```
pub trait Comparator<P> {
    fn compare(&self, a: &P, b: &P) -> Ordering;
}

/// Natural order of priorities, makes min-heap.
///
/// This is default comparator of [`HandleHeap`] and [`IntrusiveHeap`].
///
/// [`HandleHeap`]: struct.HandleHeap.html
/// [`IntrusiveHeap`]: struct.IntrusiveHeap.html
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Ascending;

/// Reversed natural order of priorities, makes max-heap.
///
/// ```
/// use indexed_priority_queue::{Descending, HandleHeap};
///
/// let mut heap = HandleHeap::with_comparator(Descending);
/// heap.enqueue("low", 1);
/// heap.enqueue("high", 10);
/// assert_eq!(heap.first(), Some(&"high"));
/// ```
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Descending;

impl<P: Ord> Comparator<P> for Ascending {
    #[inline(always)]
    fn compare(&self, a: &P, b: &P) -> Ordering {
        a.cmp(b)
    }
}

impl<P: Ord> Comparator<P> for Descending {
    #[inline(always)]
    fn compare(&self, a: &P, b: &P) -> Ordering {
        b.cmp(a)
    }
}

impl<P, F> Comparator<P> for F
where
    F: Fn(&P, &P) -> Ordering,
{
    #[inline(always)]
    fn compare(&self, a: &P, b: &P) -> Ordering {
        self(a, b)
    }
}
