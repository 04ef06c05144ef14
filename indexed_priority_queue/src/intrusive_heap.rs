use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::rc::Rc;
use std::slice::Iter as SliceIter;

use crate::comparator::{Ascending, Comparator};
use crate::sift::{self, SiftTarget};

/// Element which tracks its own position in [`IntrusiveHeap`].
///
/// Setters take shared reference so element can be kept by caller
/// (e.g. in `Rc` or by reference) while heap holds it too.
/// Usually implemented using `Cell`s, see [`QueueItem`].
///
/// It is logic error to change index or priority of enqueued element
/// other way than through methods of heap which holds it.
///
/// [`IntrusiveHeap`]: struct.IntrusiveHeap.html
/// [`QueueItem`]: struct.QueueItem.html
pub trait HeapElement {
    type Priority;

    /// Current position in heap, `None` if element is not enqueued.
    fn heap_index(&self) -> Option<usize>;

    fn set_heap_index(&self, index: Option<usize>);

    /// Called on every comparison so it should be cheap.
    fn priority(&self) -> Self::Priority;

    fn set_priority(&self, priority: Self::Priority);

    /// Identity check used to reject elements which only look like enqueued ones.
    #[inline]
    fn is_same(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl<E: HeapElement + ?Sized> HeapElement for Rc<E> {
    type Priority = E::Priority;

    #[inline(always)]
    fn heap_index(&self) -> Option<usize> {
        (**self).heap_index()
    }

    #[inline(always)]
    fn set_heap_index(&self, index: Option<usize>) {
        (**self).set_heap_index(index)
    }

    #[inline(always)]
    fn priority(&self) -> Self::Priority {
        (**self).priority()
    }

    #[inline(always)]
    fn set_priority(&self, priority: Self::Priority) {
        (**self).set_priority(priority)
    }

    #[inline(always)]
    fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<'a, E: HeapElement + ?Sized> HeapElement for &'a E {
    type Priority = E::Priority;

    #[inline(always)]
    fn heap_index(&self) -> Option<usize> {
        (**self).heap_index()
    }

    #[inline(always)]
    fn set_heap_index(&self, index: Option<usize>) {
        (**self).set_heap_index(index)
    }

    #[inline(always)]
    fn priority(&self) -> Self::Priority {
        (**self).priority()
    }

    #[inline(always)]
    fn set_priority(&self, priority: Self::Priority) {
        (**self).set_priority(priority)
    }

    #[inline(always)]
    fn is_same(&self, other: &Self) -> bool {
        (**self).is_same(*other)
    }
}

/// Ready to use [`HeapElement`] which carries some value.
///
/// [`HeapElement`]: trait.HeapElement.html
///
/// ```
/// use indexed_priority_queue::{HeapElement, QueueItem};
///
/// let item = QueueItem::with_priority("payload", 5);
/// assert_eq!(item.heap_index(), None);
/// assert_eq!(item.priority(), 5);
/// assert_eq!(item.value, "payload");
/// ```
pub struct QueueItem<T, P: Copy> {
    pub value: T,
    index: Cell<Option<usize>>,
    priority: Cell<P>,
}

impl<T, P: Copy + Default> QueueItem<T, P> {
    /// Creates not enqueued item with default priority.
    #[inline]
    pub fn new(value: T) -> Self {
        Self::with_priority(value, P::default())
    }
}

impl<T, P: Copy> QueueItem<T, P> {
    #[inline]
    pub fn with_priority(value: T, priority: P) -> Self {
        Self {
            value,
            index: Cell::new(None),
            priority: Cell::new(priority),
        }
    }
}

impl<T, P: Copy> HeapElement for QueueItem<T, P> {
    type Priority = P;

    #[inline(always)]
    fn heap_index(&self) -> Option<usize> {
        self.index.get()
    }

    #[inline(always)]
    fn set_heap_index(&self, index: Option<usize>) {
        self.index.set(index)
    }

    #[inline(always)]
    fn priority(&self) -> P {
        self.priority.get()
    }

    #[inline(always)]
    fn set_priority(&self, priority: P) {
        self.priority.set(priority)
    }
}

impl<T: Debug, P: Copy + Debug> Debug for QueueItem<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "{{value: {:?}, priority: {:?}, index: {:?}}}",
            &self.value,
            self.priority.get(),
            self.index.get()
        )
    }
}

/// Priority queue over elements which store their own position and priority.
///
/// No side tables are needed, but element can be in only one such heap at time:
/// enqueueing of element which already is in some heap is rejected.
/// Dropped or cleared heap resets positions of its elements.
///
/// Entry ranked first by comparator is dequeued first.
/// Default comparator is [`Ascending`] so by default it is min-heap.
///
/// [`Ascending`]: struct.Ascending.html
///
/// # Examples
///
/// ```
/// use indexed_priority_queue::{IntrusiveHeap, QueueItem};
/// use std::rc::Rc;
///
/// let first = Rc::new(QueueItem::with_priority("first", 1));
/// let second = Rc::new(QueueItem::with_priority("second", 2));
/// let third = Rc::new(QueueItem::with_priority("third", 3));
///
/// let mut heap = IntrusiveHeap::new();
/// assert!(heap.enqueue(Rc::clone(&second)));
/// assert!(heap.enqueue(Rc::clone(&third)));
/// assert!(heap.enqueue(Rc::clone(&first)));
/// // Already enqueued
/// assert!(!heap.enqueue(Rc::clone(&first)));
/// assert_eq!(heap.len(), 3);
///
/// assert!(heap.has(&third));
/// assert!(heap.update(&third, 0));
/// assert_eq!(heap.peek().map(|x| x.value), Some("third"));
///
/// assert!(heap.delete(&first));
/// assert!(!heap.has(&first));
///
/// assert_eq!(heap.dequeue().map(|x| x.value), Some("third"));
/// assert_eq!(heap.dequeue().map(|x| x.value), Some("second"));
/// assert!(heap.dequeue().is_none());
/// ```
pub struct IntrusiveHeap<E: HeapElement, C = Ascending> {
    elements: Vec<E>,
    comparator: C,
}

impl<E: HeapElement> IntrusiveHeap<E, Ascending>
where
    E::Priority: Ord,
{
    /// Creates an empty min-heap
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity_and_comparator(0, Ascending)
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Ascending)
    }
}

impl<E: HeapElement, C: Comparator<E::Priority>> IntrusiveHeap<E, C> {
    /// Creates an empty heap ordered by `comparator`.
    ///
    /// ### Examples
    ///
    /// ```
    /// use indexed_priority_queue::{Descending, IntrusiveHeap, QueueItem};
    ///
    /// let small = QueueItem::with_priority("small", 1);
    /// let big = QueueItem::with_priority("big", 10);
    /// let mut heap = IntrusiveHeap::with_comparator(Descending);
    /// heap.enqueue(&small);
    /// heap.enqueue(&big);
    /// assert_eq!(heap.dequeue().map(|x| x.value), Some("big"));
    /// ```
    #[inline]
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_capacity_and_comparator(0, comparator)
    }

    #[inline]
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            comparator,
        }
    }

    /// Reserves space for at least `additional` new elements.
    ///
    /// ### Panics
    ///
    /// Panics if the new capacity overflows `usize`.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.elements.reserve(additional);
    }

    /// Adds element with its current priority.
    /// Returns `false` and does nothing if element is already enqueued.
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***, ***O(n)*** if reallocation happens.
    pub fn enqueue(&mut self, element: E) -> bool {
        if element.heap_index().is_some() {
            return false;
        }
        let slot = self.elements.len();
        self.push_unordered(element);
        sift::sift_up(self, slot);
        true
    }

    /// Sets priority of element and adds it.
    /// Returns `false` and changes nothing if element is already enqueued.
    #[inline]
    pub fn enqueue_with_priority(&mut self, element: E, priority: E::Priority) -> bool {
        if element.heap_index().is_some() {
            return false;
        }
        element.set_priority(priority);
        self.enqueue(element)
    }

    /// Adds all not yet enqueued elements and restores heap order once.
    /// Returns number of skipped elements.
    ///
    /// ### Time complexity
    ///
    /// ***O(n + k)*** where `k` is number of new elements.
    #[inline]
    pub fn batch_enqueue<I: IntoIterator<Item = E>>(&mut self, elements: I) -> usize {
        self.batch_enqueue_with_priorities(elements, std::iter::empty())
    }

    /// Same as [`batch_enqueue`] but `i`-th element gets `i`-th priority first.
    ///
    /// If there are fewer priorities than elements, the rest keep their own.
    /// Skipped elements are left untouched.
    ///
    /// [`batch_enqueue`]: struct.IntrusiveHeap.html#method.batch_enqueue
    ///
    /// ### Examples
    ///
    /// ```
    /// use indexed_priority_queue::{IntrusiveHeap, QueueItem};
    ///
    /// let items: Vec<_> = ["c", "a", "b", "last"]
    ///     .iter()
    ///     .map(|&x| QueueItem::with_priority(x, 100))
    ///     .collect();
    /// let mut heap = IntrusiveHeap::new();
    /// assert_eq!(heap.batch_enqueue_with_priorities(&items, vec![3, 1, 2]), 0);
    /// assert_eq!(heap.batch_enqueue_with_priorities(&items, vec![0, 0, 0, 0]), 4);
    ///
    /// let order: Vec<_> = std::iter::from_fn(|| heap.dequeue()).map(|x| x.value).collect();
    /// assert_eq!(order, vec!["a", "b", "c", "last"]);
    /// ```
    pub fn batch_enqueue_with_priorities<I, J>(&mut self, elements: I, priorities: J) -> usize
    where
        I: IntoIterator<Item = E>,
        J: IntoIterator<Item = E::Priority>,
    {
        let elements = elements.into_iter();
        let mut priorities = priorities.into_iter();
        self.reserve(elements.size_hint().0);

        let mut skipped = 0;
        for element in elements {
            let priority = priorities.next();
            if element.heap_index().is_some() {
                skipped += 1;
                continue;
            }
            if let Some(priority) = priority {
                element.set_priority(priority);
            }
            self.push_unordered(element);
        }

        sift::heapify(self);
        debug_assert!(sift::is_heap(&*self), "Heap is invalid after batch");
        skipped
    }

    /// Removes and returns element ranked first by comparator.
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***
    pub fn dequeue(&mut self) -> Option<E> {
        let last = self.elements.pop()?;
        if self.elements.is_empty() {
            last.set_heap_index(None);
            return Some(last);
        }
        let root = std::mem::replace(&mut self.elements[0], last);
        self.elements[0].set_heap_index(Some(0));
        root.set_heap_index(None);
        sift::sift_down_to_leaf(self, 0);
        Some(root)
    }

    /// Element which would be dequeued next.
    ///
    /// ### Time complexity
    ///
    /// Always ***O(1)***
    #[inline]
    pub fn peek(&self) -> Option<&E> {
        self.elements.first()
    }

    /// Checks that element is in this heap.
    ///
    /// ### Time complexity
    ///
    /// Always ***O(1)***
    #[inline]
    pub fn has(&self, element: &E) -> bool {
        match element.heap_index() {
            Some(index) => match self.elements.get(index) {
                Some(current) => current.is_same(element),
                None => false,
            },
            None => false,
        }
    }

    /// Changes priority of enqueued element.
    /// Returns `false` if element is not in heap.
    ///
    /// If comparator ranks new priority equal to the old one, priority is stored
    /// without moving element and `false` is returned too.
    ///
    /// ### Examples
    ///
    /// ```
    /// use indexed_priority_queue::{HeapElement, IntrusiveHeap, QueueItem};
    ///
    /// // Ordered only by deadline, second field is payload
    /// let timer = QueueItem::with_priority("timer", (5u32, 1u32));
    /// let mut heap = IntrusiveHeap::with_comparator(|a: &(u32, u32), b: &(u32, u32)| a.0.cmp(&b.0));
    /// heap.enqueue(&timer);
    /// assert!(!heap.update(&&timer, (5, 99)));
    /// assert_eq!(timer.priority(), (5, 99));
    /// assert!(heap.update(&&timer, (1, 99)));
    /// ```
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***
    pub fn update(&mut self, element: &E, priority: E::Priority) -> bool {
        if !self.has(element) {
            return false;
        }
        if self.comparator.compare(&element.priority(), &priority) == Ordering::Equal {
            // Rank is the same so heap order holds
            element.set_priority(priority);
            return false;
        }
        match self.remove(element) {
            Some(removed) => self.enqueue_with_priority(removed, priority),
            None => false,
        }
    }

    /// Removes element from any position of heap.
    /// Returns `false` if element is not in heap.
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***
    #[inline]
    pub fn delete(&mut self, element: &E) -> bool {
        self.remove(element).is_some()
    }

    /// Removes element and returns instance which was held by heap.
    pub fn remove(&mut self, element: &E) -> Option<E> {
        if !self.has(element) {
            return None;
        }
        let slot = element.heap_index()?;
        let last = self.elements.len() - 1;
        if slot != last {
            SiftTarget::swap(self, slot, last);
        }
        let removed = self.elements.pop()?;
        debug_assert!(removed.is_same(element));
        removed.set_heap_index(None);
        // Moved last element can violate order in both directions
        if slot < self.elements.len() {
            sift::sift_both(self, slot);
        }
        Some(removed)
    }

    /// Removes all elements. Returns `false` if heap was already empty.
    pub fn clear(&mut self) -> bool {
        if self.elements.is_empty() {
            return false;
        }
        for element in self.elements.drain(..) {
            element.set_heap_index(None);
        }
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Calls `f` for every element and its index in storage order,
    /// which is not priority order.
    pub fn for_each<F: FnMut(&E, usize)>(&self, mut f: F) {
        for (index, element) in self.elements.iter().enumerate() {
            debug_assert_eq!(element.heap_index(), Some(index));
            f(element, index);
        }
    }

    /// Iterates over elements in arbitrary order.
    #[inline]
    pub fn iter(&self) -> SliceIter<'_, E> {
        self.elements.iter()
    }

    #[inline(always)]
    fn push_unordered(&mut self, element: E) {
        element.set_heap_index(Some(self.elements.len()));
        self.elements.push(element);
    }
}

impl<E: HeapElement, C: Comparator<E::Priority>> SiftTarget for IntrusiveHeap<E, C> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline(always)]
    fn compare(&self, a: usize, b: usize) -> Ordering {
        self.comparator
            .compare(&self.elements[a].priority(), &self.elements[b].priority())
    }

    #[inline(always)]
    fn swap(&mut self, a: usize, b: usize) {
        self.elements.swap(a, b);
        self.elements[a].set_heap_index(Some(a));
        self.elements[b].set_heap_index(Some(b));
    }
}

impl<E: HeapElement, C> Drop for IntrusiveHeap<E, C> {
    fn drop(&mut self) {
        for element in self.elements.iter() {
            element.set_heap_index(None);
        }
    }
}

// Default implementations

impl<E: HeapElement, C: Comparator<E::Priority> + Default> Default for IntrusiveHeap<E, C> {
    #[inline]
    fn default() -> Self {
        Self::with_capacity_and_comparator(0, C::default())
    }
}

impl<E: HeapElement + Debug, C> Debug for IntrusiveHeap<E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_list().entries(self.elements.iter()).finish()
    }
}
