use std::fmt::Debug;
use std::iter::{FromIterator, Zip};
use std::slice::Iter as SliceIter;

use crate::comparator::{Ascending, Comparator};
use crate::descriptors::{Descriptor, DescriptorTable};
use crate::error::DescriptorBufferTooSmallError;
use crate::sift::{self, SiftTarget};

/// Priority queue which returns [`Descriptor`] for every enqueued entry.
///
/// Descriptor allows to check, update or delete entry later in ***O(log n)***
/// without requiring anything from element type.
/// Elements may repeat: same value enqueued twice gets two descriptors.
///
/// Entry ranked first by comparator is dequeued first.
/// Default comparator is [`Ascending`] so by default it is min-heap.
///
/// It is logic error if priority values changes other way than by [`update`] method,
/// or if descriptor issued by one heap is used with another one.
///
/// [`Descriptor`]: struct.Descriptor.html
/// [`Ascending`]: struct.Ascending.html
/// [`update`]: struct.HandleHeap.html#method.update
///
/// # Examples
///
/// ```
/// use indexed_priority_queue::HandleHeap;
///
/// let mut heap = HandleHeap::new();
///
/// // Currently heap is empty
/// assert_eq!(heap.first(), None);
///
/// heap.enqueue("Second", 2);
/// let third = heap.enqueue("Third", 3);
/// heap.enqueue("First", 1);
/// let fourth = heap.enqueue("Fourth", 4);
///
/// assert_eq!(heap.peek(), Some((&"First", &1)));
/// assert_eq!(heap.len(), 4);
///
/// // Descriptor gives cheap access to entry
/// assert!(heap.has_descriptor(&"Fourth", fourth));
/// assert_eq!(heap.update_descriptor(&"Fourth", 0, fourth), Some(fourth));
/// assert_eq!(heap.dequeue(), Some("Fourth"));
///
/// // But we can also look element up by value
/// assert!(heap.delete(&"Second"));
/// assert!(!heap.delete(&"Second"));
///
/// assert_eq!(heap.dequeue_entry(), Some(("First", 1)));
/// assert_eq!(heap.get(third), Some((&"Third", &3)));
/// assert_eq!(heap.dequeue(), Some("Third"));
/// assert_eq!(heap.dequeue(), None);
/// ```
#[derive(Clone)]
pub struct HandleHeap<TElement, TPriority, C = Ascending> {
    elements: Vec<TElement>,
    priorities: Vec<TPriority>,
    slot_to_descriptor: Vec<Descriptor>,
    descriptors: DescriptorTable,
    comparator: C,
}

impl<TElement, TPriority: Ord> HandleHeap<TElement, TPriority, Ascending> {
    /// Creates an empty min-heap
    ///
    /// ### Examples
    ///
    /// ```
    /// use indexed_priority_queue::HandleHeap;
    /// let mut heap = HandleHeap::new();
    /// heap.enqueue("Element", 4);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity_and_comparator(0, Ascending)
    }

    /// Creates an empty min-heap with allocated memory enough
    /// to keep `capacity` entries without reallocation.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Ascending)
    }
}

impl<TElement, TPriority, C: Comparator<TPriority>> HandleHeap<TElement, TPriority, C> {
    /// Creates an empty heap ordered by `comparator`.
    ///
    /// ### Examples
    ///
    /// ```
    /// use indexed_priority_queue::HandleHeap;
    /// // Max-heap
    /// let mut heap = HandleHeap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// heap.enqueue("Small", 1);
    /// heap.enqueue("Big", 10);
    /// assert_eq!(heap.dequeue(), Some("Big"));
    /// ```
    #[inline]
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_capacity_and_comparator(0, comparator)
    }

    #[inline]
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            priorities: Vec::with_capacity(capacity),
            slot_to_descriptor: Vec::with_capacity(capacity),
            descriptors: DescriptorTable::with_capacity(capacity),
            comparator,
        }
    }

    /// Reserves space for at least `additional` new entries.
    ///
    /// ### Panics
    ///
    /// Panics if the new capacity overflows `usize`.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.elements.reserve(additional);
        self.priorities.reserve(additional);
        self.slot_to_descriptor.reserve(additional);
        self.descriptors.reserve(additional);
    }

    /// Adds entry to heap and returns its descriptor.
    ///
    /// Most recently released descriptor is reused if there is any.
    ///
    /// ### Examples
    ///
    /// ```
    /// use indexed_priority_queue::HandleHeap;
    /// let mut heap = HandleHeap::new();
    /// let a = heap.enqueue('a', 5);
    /// let b = heap.enqueue('b', 3);
    /// assert_ne!(a, b);
    ///
    /// assert_eq!(heap.dequeue(), Some('b'));
    /// // Descriptor of 'b' is free now
    /// assert_eq!(heap.enqueue('c', 1), b);
    /// ```
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***, ***O(n)*** if reallocation happens.
    pub fn enqueue(&mut self, element: TElement, priority: TPriority) -> Descriptor {
        let slot = self.elements.len();
        let descriptor = self.push_unordered(element, priority);
        sift::sift_up(self, slot);
        descriptor
    }

    /// Adds all entries and restores heap order once.
    /// Returns descriptors in the order of entries.
    ///
    /// Descriptors are assigned the same way as [`enqueue`] does it.
    ///
    /// [`enqueue`]: struct.HandleHeap.html#method.enqueue
    ///
    /// ### Examples
    ///
    /// ```
    /// use indexed_priority_queue::HandleHeap;
    /// let mut heap = HandleHeap::new();
    /// let descriptors = heap.batch_enqueue(vec![("c", 3), ("a", 1), ("b", 2)]);
    /// assert_eq!(heap.get(descriptors[1]), Some((&"a", &1)));
    /// assert_eq!(heap.dequeue(), Some("a"));
    /// ```
    ///
    /// ### Time complexity
    ///
    /// ***O(n + k)*** where `k` is number of new entries.
    pub fn batch_enqueue<I>(&mut self, entries: I) -> Vec<Descriptor>
    where
        I: IntoIterator<Item = (TElement, TPriority)>,
    {
        let entries = entries.into_iter();
        self.reserve(entries.size_hint().0);
        let descriptors = entries
            .map(|(element, priority)| self.push_unordered(element, priority))
            .collect();
        self.rebuild();
        descriptors
    }

    /// Same as [`batch_enqueue`] but writes descriptor of `i`-th entry
    /// into `buffer[offset + i]`.
    ///
    /// Fails without any changes if buffer is too short for all entries.
    ///
    /// [`batch_enqueue`]: struct.HandleHeap.html#method.batch_enqueue
    ///
    /// ### Examples
    ///
    /// ```
    /// use indexed_priority_queue::HandleHeap;
    /// let mut heap = HandleHeap::new();
    /// let mut buffer = vec![None; 4];
    /// heap.batch_enqueue_into(vec![("b", 2), ("a", 1)], &mut buffer, 2).unwrap();
    /// assert!(buffer[0].is_none());
    /// assert_eq!(heap.get(buffer[3].unwrap()), Some((&"a", &1)));
    ///
    /// assert!(heap.batch_enqueue_into(vec![("c", 3)], &mut buffer, 4).is_err());
    /// assert_eq!(heap.len(), 2);
    /// ```
    pub fn batch_enqueue_into<I>(
        &mut self,
        entries: I,
        buffer: &mut [Option<Descriptor>],
        offset: usize,
    ) -> Result<(), DescriptorBufferTooSmallError>
    where
        I: IntoIterator<Item = (TElement, TPriority)>,
        I::IntoIter: ExactSizeIterator,
    {
        let mut entries = entries.into_iter();
        let required = offset.saturating_add(entries.len());
        if required > buffer.len() {
            return Err(DescriptorBufferTooSmallError {
                required,
                available: buffer.len(),
            });
        }
        self.reserve(entries.len());
        // Buffer goes first so zip doesn't pull entry which has no place
        for (out, (element, priority)) in buffer[offset..].iter_mut().zip(entries.by_ref()) {
            *out = Some(self.push_unordered(element, priority));
        }
        debug_assert!(
            entries.next().is_none(),
            "Iterator yielded more entries than its len()"
        );
        self.rebuild();
        Ok(())
    }

    /// Removes and returns element ranked first by comparator.
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***
    #[inline]
    pub fn dequeue(&mut self) -> Option<TElement> {
        self.dequeue_entry().map(|(element, _)| element)
    }

    /// Removes and returns first element along with its priority.
    pub fn dequeue_entry(&mut self) -> Option<(TElement, TPriority)> {
        if self.is_empty() {
            return None;
        }
        let removed = self.detach(0);
        if !self.is_empty() {
            sift::sift_down_to_leaf(self, 0);
        }
        Some(removed)
    }

    /// Element which would be dequeued next.
    ///
    /// ### Time complexity
    ///
    /// Always ***O(1)***
    #[inline]
    pub fn first(&self) -> Option<&TElement> {
        self.elements.first()
    }

    /// Priority of element which would be dequeued next.
    #[inline]
    pub fn first_priority(&self) -> Option<&TPriority> {
        self.priorities.first()
    }

    #[inline]
    pub fn peek(&self) -> Option<(&TElement, &TPriority)> {
        Some((self.first()?, self.first_priority()?))
    }

    /// Gets entry by descriptor.
    /// Returns `None` for released descriptors.
    ///
    /// ### Time complexity
    ///
    /// Always ***O(1)***
    #[inline]
    pub fn get(&self, descriptor: Descriptor) -> Option<(&TElement, &TPriority)> {
        let slot = self.descriptors.slot_of(descriptor)?;
        Some((&self.elements[slot], &self.priorities[slot]))
    }

    /// Removes all entries. Returns `false` if heap was already empty.
    ///
    /// Descriptor numbering starts from zero again.
    pub fn clear(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.elements.clear();
        self.priorities.clear();
        self.slot_to_descriptor.clear();
        self.descriptors.clear();
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.elements.len(), self.priorities.len());
        debug_assert_eq!(self.elements.len(), self.descriptors.live());
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Calls `f` for every entry in storage order which is not priority order.
    pub fn for_each<F: FnMut(&TElement, &TPriority)>(&self, mut f: F) {
        for (element, priority) in self.iter() {
            f(element, priority);
        }
    }

    /// Iterates over entries in arbitrary order.
    ///
    /// ### Time complexity
    ///
    /// Iterating over whole heap is ***O(n)***
    pub fn iter(&self) -> HandleHeapIter<'_, TElement, TPriority> {
        HandleHeapIter {
            inner: self.elements.iter().zip(self.priorities.iter()),
        }
    }

    // Appends entry without restoring heap order
    #[inline(always)]
    fn push_unordered(&mut self, element: TElement, priority: TPriority) -> Descriptor {
        let slot = self.elements.len();
        let descriptor = self.descriptors.acquire(slot);
        self.elements.push(element);
        self.priorities.push(priority);
        self.slot_to_descriptor.push(descriptor);
        descriptor
    }

    fn rebuild(&mut self) {
        sift::heapify(self);
        debug_assert!(sift::is_heap(&*self), "Heap is invalid after rebuild");
    }

    // Moves slot to the end, cuts it off and releases its descriptor.
    // Heap order around `slot` is left for caller to restore.
    fn detach(&mut self, slot: usize) -> (TElement, TPriority) {
        let last = self.elements.len() - 1;
        if slot != last {
            SiftTarget::swap(self, slot, last);
        }
        let descriptor = self
            .slot_to_descriptor
            .pop()
            .expect("Checked by caller that heap is not empty");
        self.descriptors.release(descriptor);
        let element = self.elements.pop().expect("Same length as descriptors");
        let priority = self.priorities.pop().expect("Same length as descriptors");
        (element, priority)
    }

    fn remove_slot(&mut self, slot: usize) -> (TElement, TPriority) {
        let removed = self.detach(slot);
        // Moved last entry can violate order in both directions
        if slot < self.elements.len() {
            sift::sift_both(self, slot);
        }
        removed
    }
}

impl<TElement: PartialEq, TPriority, C: Comparator<TPriority>> HandleHeap<TElement, TPriority, C> {
    /// Finds descriptor of element using linear scan.
    ///
    /// If element was enqueued multiple times, descriptor of one of them is returned,
    /// which one is unspecified.
    ///
    /// ### Time complexity
    ///
    /// ***O(n)***
    pub fn descriptor_of(&self, element: &TElement) -> Option<Descriptor> {
        let slot = self.elements.iter().position(|x| x == element)?;
        Some(self.slot_to_descriptor[slot])
    }

    /// Checks if element is in heap.
    ///
    /// ### Time complexity
    ///
    /// ***O(n)***, use [`has_descriptor`] for ***O(1)*** check.
    ///
    /// [`has_descriptor`]: struct.HandleHeap.html#method.has_descriptor
    #[inline]
    pub fn has(&self, element: &TElement) -> bool {
        self.descriptor_of(element).is_some()
    }

    /// Checks that descriptor is live and points to element equal to `element`.
    /// This rejects stale descriptors reused by other elements.
    ///
    /// ### Examples
    ///
    /// ```
    /// use indexed_priority_queue::HandleHeap;
    /// let mut heap = HandleHeap::new();
    /// let old = heap.enqueue("old", 1);
    /// heap.dequeue();
    /// let new = heap.enqueue("new", 1);
    /// // Descriptor is reused
    /// assert_eq!(old, new);
    /// assert!(!heap.has_descriptor(&"old", old));
    /// assert!(heap.has_descriptor(&"new", new));
    /// ```
    #[inline]
    pub fn has_descriptor(&self, element: &TElement, descriptor: Descriptor) -> bool {
        match self.get(descriptor) {
            Some((current, _)) => current == element,
            None => false,
        }
    }

    /// Changes priority of element found by linear scan.
    /// Returns new descriptor of element or `None` if element is not in heap.
    #[inline]
    pub fn update(&mut self, element: &TElement, priority: TPriority) -> Option<Descriptor> {
        let descriptor = self.descriptor_of(element)?;
        self.update_descriptor(element, priority, descriptor)
    }

    /// Changes priority of entry.
    /// Returns new descriptor of element or `None` without any changes
    /// if descriptor doesn't point to `element`.
    ///
    /// It works as deletion followed by enqueue, so it is always
    /// the same descriptor because released one is reused first.
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***
    pub fn update_descriptor(
        &mut self,
        element: &TElement,
        priority: TPriority,
        descriptor: Descriptor,
    ) -> Option<Descriptor> {
        let (removed, _) = self.take(element, descriptor)?;
        Some(self.enqueue(removed, priority))
    }

    /// Removes element found by linear scan.
    /// Returns `false` if there was no such element.
    #[inline]
    pub fn delete(&mut self, element: &TElement) -> bool {
        match self.descriptor_of(element) {
            Some(descriptor) => self.delete_descriptor(element, descriptor),
            None => false,
        }
    }

    /// Removes entry from any position of heap.
    /// Returns `false` without any changes if descriptor doesn't point to `element`.
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***
    #[inline]
    pub fn delete_descriptor(&mut self, element: &TElement, descriptor: Descriptor) -> bool {
        self.take(element, descriptor).is_some()
    }

    fn take(
        &mut self,
        element: &TElement,
        descriptor: Descriptor,
    ) -> Option<(TElement, TPriority)> {
        if !self.has_descriptor(element, descriptor) {
            return None;
        }
        let slot = self
            .descriptors
            .slot_of(descriptor)
            .expect("Checked by has_descriptor");
        Some(self.remove_slot(slot))
    }
}

impl<TElement, TPriority, C: Comparator<TPriority>> SiftTarget
    for HandleHeap<TElement, TPriority, C>
{
    #[inline(always)]
    fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline(always)]
    fn compare(&self, a: usize, b: usize) -> std::cmp::Ordering {
        self.comparator
            .compare(&self.priorities[a], &self.priorities[b])
    }

    #[inline(always)]
    fn swap(&mut self, a: usize, b: usize) {
        self.elements.swap(a, b);
        self.priorities.swap(a, b);
        self.slot_to_descriptor.swap(a, b);
        self.descriptors.relink(self.slot_to_descriptor[a], a);
        self.descriptors.relink(self.slot_to_descriptor[b], b);
    }
}

// Default implementations

impl<TElement: Debug, TPriority: Debug, C> Debug for HandleHeap<TElement, TPriority, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "[")?;
        for entry in self.elements.iter().zip(self.priorities.iter()) {
            write!(f, "{:?}", entry)?;
        }
        write!(f, "]")
    }
}

impl<TElement, TPriority, C: Comparator<TPriority> + Default> Default
    for HandleHeap<TElement, TPriority, C>
{
    #[inline]
    fn default() -> Self {
        Self::with_capacity_and_comparator(0, C::default())
    }
}

impl<TElement, TPriority, C> FromIterator<(TElement, TPriority)>
    for HandleHeap<TElement, TPriority, C>
where
    C: Comparator<TPriority> + Default,
{
    /// Allows building heap from iterator using `collect()`.
    /// Entries get descriptors `0, 1, 2...` in iteration order.
    ///
    /// ### Examples
    ///
    /// ```
    /// use indexed_priority_queue::HandleHeap;
    /// let mut heap: HandleHeap<&str, i32> =
    ///     vec![("third", 2), ("first", 0), ("second", 1)].into_iter().collect();
    /// assert_eq!(heap.dequeue(), Some("first"));
    /// assert_eq!(heap.dequeue(), Some("second"));
    /// assert_eq!(heap.dequeue(), Some("third"));
    /// ```
    ///
    /// ### Time complexity
    ///
    /// ***O(n)***
    fn from_iter<I: IntoIterator<Item = (TElement, TPriority)>>(iter: I) -> Self {
        let mut heap = Self::default();
        heap.batch_enqueue(iter);
        heap
    }
}

impl<TElement, TPriority, C: Comparator<TPriority>> Extend<(TElement, TPriority)>
    for HandleHeap<TElement, TPriority, C>
{
    #[inline]
    fn extend<I: IntoIterator<Item = (TElement, TPriority)>>(&mut self, iter: I) {
        self.batch_enqueue(iter);
    }
}

impl<TElement, TPriority, C: Comparator<TPriority>> IntoIterator
    for HandleHeap<TElement, TPriority, C>
{
    type Item = (TElement, TPriority);
    type IntoIter = HandleHeapIntoIter<TElement, TPriority, C>;

    /// Make iterator that dequeues entries in priority order.
    ///
    /// ### Examples
    ///
    /// ```
    /// use indexed_priority_queue::HandleHeap;
    /// let heap: HandleHeap<char, u8> = vec![('b', 2), ('c', 3), ('a', 1)].into_iter().collect();
    /// let drained: Vec<_> = heap.into_iter().collect();
    /// assert_eq!(drained, vec![('a', 1), ('b', 2), ('c', 3)]);
    /// ```
    ///
    /// ### Time complexity
    ///
    /// ***O(n log n)*** for iteration.
    fn into_iter(self) -> Self::IntoIter {
        HandleHeapIntoIter { heap: self }
    }
}

impl<'a, TElement, TPriority, C: Comparator<TPriority>> IntoIterator
    for &'a HandleHeap<TElement, TPriority, C>
{
    type Item = (&'a TElement, &'a TPriority);
    type IntoIter = HandleHeapIter<'a, TElement, TPriority>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// This is consuming iterator that returns entries in priority order
///
/// ### Time complexity
/// Overall complexity of iteration is ***O(n log n)***
pub struct HandleHeapIntoIter<TElement, TPriority, C = Ascending> {
    heap: HandleHeap<TElement, TPriority, C>,
}

impl<TElement, TPriority, C: Comparator<TPriority>> Iterator
    for HandleHeapIntoIter<TElement, TPriority, C>
{
    type Item = (TElement, TPriority);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.heap.dequeue_entry()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.heap.len();
        (size, Some(size))
    }
}

impl<TElement, TPriority, C: Comparator<TPriority>> ExactSizeIterator
    for HandleHeapIntoIter<TElement, TPriority, C>
{
}

/// This is unordered borrowing iterator over entries of heap.
pub struct HandleHeapIter<'a, TElement, TPriority> {
    inner: Zip<SliceIter<'a, TElement>, SliceIter<'a, TPriority>>,
}

impl<'a, TElement, TPriority> Iterator for HandleHeapIter<'a, TElement, TPriority> {
    type Item = (&'a TElement, &'a TPriority);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, TElement, TPriority> ExactSizeIterator for HandleHeapIter<'a, TElement, TPriority> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::Descending;
    use std::collections::HashSet;

    fn assert_valid<TE, TP, C: Comparator<TP>>(heap: &HandleHeap<TE, TP, C>) {
        assert!(sift::is_heap(heap), "Heap order is broken");
        assert_eq!(heap.slot_to_descriptor.len(), heap.elements.len());
        let mut seen = HashSet::new();
        for (slot, &descriptor) in heap.slot_to_descriptor.iter().enumerate() {
            assert!(seen.insert(descriptor), "Duplicate descriptor {}", descriptor);
            assert_eq!(heap.descriptors.slot_of(descriptor), Some(slot));
        }
        assert_eq!(heap.descriptors.live(), heap.elements.len());
    }

    fn drain<TE, TP, C: Comparator<TP>>(heap: &mut HandleHeap<TE, TP, C>) -> Vec<TP> {
        let mut result = Vec::new();
        while let Some((_, priority)) = heap.dequeue_entry() {
            assert_valid(heap);
            result.push(priority);
        }
        result
    }

    const PRIORITIES: [i32; 10] = [9, 3, 1, 4, 2, 5, 8, 7, 6, 0];

    #[test]
    fn test_sorted_extraction() {
        let mut heap = HandleHeap::new();
        for (i, &x) in PRIORITIES.iter().enumerate() {
            heap.enqueue(x, x);
            assert_eq!(heap.len(), i + 1);
            assert_valid(&heap);
        }
        assert_eq!(drain(&mut heap), (0..10).collect::<Vec<_>>());
        assert_eq!(heap.dequeue(), None);
    }

    #[test]
    fn test_reversed_comparator() {
        let mut heap = HandleHeap::with_comparator(Descending);
        for &x in PRIORITIES.iter() {
            heap.enqueue(x, x);
        }
        assert_eq!(drain(&mut heap), (0..10).rev().collect::<Vec<_>>());

        let mut heap = HandleHeap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
        for &x in PRIORITIES.iter() {
            heap.enqueue(x, x);
        }
        assert_eq!(drain(&mut heap), (0..10).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_first() {
        let mut heap = HandleHeap::new();
        assert_eq!(heap.first(), None);
        assert_eq!(heap.first_priority(), None);
        assert_eq!(heap.peek(), None);
        heap.enqueue("second", 2);
        heap.enqueue("first", 1);
        heap.enqueue("third", 3);
        assert_eq!(heap.first(), Some(&"first"));
        assert_eq!(heap.first_priority(), Some(&1));
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn test_descriptors_unique_and_reused() {
        let mut heap = HandleHeap::new();
        let descriptors: Vec<_> = (0..5).map(|x| heap.enqueue(x, x)).collect();
        let unique: HashSet<_> = descriptors.iter().copied().collect();
        assert_eq!(unique.len(), 5);
        assert_eq!(
            descriptors,
            (0..5).map(Descriptor::new).collect::<Vec<_>>()
        );

        assert!(heap.delete_descriptor(&1, descriptors[1]));
        assert!(heap.delete_descriptor(&3, descriptors[3]));
        assert_valid(&heap);

        // LIFO reuse
        assert_eq!(heap.enqueue(10, 10), descriptors[3]);
        assert_eq!(heap.enqueue(11, 11), descriptors[1]);
        assert_eq!(heap.enqueue(12, 12), Descriptor::new(5));
        assert_valid(&heap);

        assert!(!heap.has_descriptor(&3, descriptors[3]));
        assert!(heap.has_descriptor(&10, descriptors[3]));
        assert_eq!(heap.dequeue(), Some(0));
        assert_eq!(heap.enqueue(20, 20), descriptors[0]);
    }

    #[test]
    fn test_has() {
        let mut heap = HandleHeap::new();
        assert!(!heap.has(&"a"));
        let a = heap.enqueue("a", 1);
        assert!(heap.has(&"a"));
        assert!(!heap.has(&"b"));
        assert!(heap.has_descriptor(&"a", a));
        assert!(!heap.has_descriptor(&"b", a));
        assert!(!heap.has_descriptor(&"a", Descriptor::new(100)));
        assert_eq!(heap.descriptor_of(&"a"), Some(a));
        assert_eq!(heap.descriptor_of(&"b"), None);
    }

    #[test]
    fn test_update() {
        let mut heap = HandleHeap::new();
        for &x in PRIORITIES.iter() {
            heap.enqueue(x, x);
        }
        let descriptor = heap.descriptor_of(&7).unwrap();
        assert_eq!(heap.update(&7, -1), Some(descriptor));
        assert_valid(&heap);
        assert_eq!(heap.peek(), Some((&7, &-1)));

        assert_eq!(heap.update(&5, 100), heap.descriptor_of(&5));
        assert_valid(&heap);

        let mut order = Vec::new();
        while let Some(x) = heap.dequeue() {
            order.push(x);
        }
        assert_eq!(order, vec![7, 0, 1, 2, 3, 4, 6, 8, 9, 5]);
    }

    #[test]
    fn test_update_absent() {
        let mut heap = HandleHeap::new();
        for &x in PRIORITIES.iter() {
            heap.enqueue(x, x);
        }
        let before: Vec<_> = heap.iter().map(|(&e, &p)| (e, p)).collect();
        assert_eq!(heap.update(&42, 0), None);
        assert_eq!(heap.update_descriptor(&3, 0, Descriptor::new(0)), None);
        let after: Vec<_> = heap.iter().map(|(&e, &p)| (e, p)).collect();
        assert_eq!(before, after);
        assert_eq!(heap.len(), PRIORITIES.len());
    }

    #[test]
    fn test_delete_once() {
        let mut heap = HandleHeap::new();
        for &x in PRIORITIES.iter() {
            heap.enqueue(x, x);
        }
        for &x in PRIORITIES.iter() {
            let len = heap.len();
            assert!(heap.delete(&x));
            assert_eq!(heap.len(), len - 1);
            assert_valid(&heap);
            assert!(!heap.delete(&x));
            assert_eq!(heap.len(), len - 1);
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn test_delete_keeps_order() {
        let mut heap = HandleHeap::new();
        let items = [300, 500, 400, 400, 600, 100, 200];
        let descriptors: Vec<_> = items.iter().map(|&x| heap.enqueue(x, x)).collect();
        assert!(heap.delete_descriptor(&500, descriptors[1]));
        assert_valid(&heap);
        assert_eq!(drain(&mut heap), vec![100, 200, 300, 400, 400, 600]);
    }

    #[test]
    fn test_delete_last_slot() {
        let mut heap = HandleHeap::new();
        heap.enqueue(1, 1);
        heap.enqueue(2, 2);
        assert!(heap.delete(&2));
        assert_valid(&heap);
        assert!(heap.delete(&1));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_duplicates() {
        let mut heap = HandleHeap::new();
        let first = heap.enqueue("same", 2);
        let second = heap.enqueue("same", 1);
        assert_ne!(first, second);
        assert_eq!(heap.len(), 2);
        assert!(heap.has_descriptor(&"same", first));
        assert!(heap.has_descriptor(&"same", second));
        assert!(heap.delete_descriptor(&"same", first));
        assert_eq!(heap.peek(), Some((&"same", &1)));
        assert!(!heap.delete_descriptor(&"same", first));
        assert!(heap.delete(&"same"));
        assert!(!heap.delete(&"same"));
    }

    #[test]
    fn test_batch_enqueue() {
        let mut heap = HandleHeap::new();
        let descriptors = heap.batch_enqueue(PRIORITIES.iter().map(|&x| (x, x)));
        assert_valid(&heap);
        for (&x, &descriptor) in PRIORITIES.iter().zip(descriptors.iter()) {
            assert_eq!(heap.get(descriptor), Some((&x, &x)));
        }
        assert_eq!(drain(&mut heap), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_batch_equivalence() {
        let pairs: Vec<(usize, i32)> = [5, 3, 3, 8, -1, 0, 12, 5, 7, 7, 2, 9, -4]
            .iter()
            .copied()
            .enumerate()
            .collect();
        let mut sequential = HandleHeap::new();
        for &(e, p) in pairs.iter() {
            sequential.enqueue(e, p);
        }
        let mut batched: HandleHeap<usize, i32> = pairs.iter().copied().collect();
        assert_valid(&batched);
        assert_eq!(drain(&mut sequential), drain(&mut batched));
    }

    #[test]
    fn test_batch_enqueue_reuses_descriptors() {
        let mut heap = HandleHeap::new();
        for x in 0..4 {
            heap.enqueue(x, x);
        }
        heap.dequeue();
        heap.dequeue();
        let descriptors = heap.batch_enqueue(vec![(10, 10), (11, 11), (12, 12)]);
        assert_eq!(
            descriptors,
            vec![Descriptor::new(1), Descriptor::new(0), Descriptor::new(4)]
        );
        assert_valid(&heap);
    }

    #[test]
    fn test_batch_enqueue_into() {
        let mut heap = HandleHeap::new();
        heap.enqueue(100, 100);
        let mut buffer = vec![None; 5];
        heap.batch_enqueue_into(vec![(3, 3), (1, 1), (2, 2)], &mut buffer, 1)
            .unwrap();
        assert_valid(&heap);
        assert_eq!(
            buffer,
            vec![
                None,
                Some(Descriptor::new(1)),
                Some(Descriptor::new(2)),
                Some(Descriptor::new(3)),
                None
            ]
        );
        assert_eq!(heap.get(Descriptor::new(2)), Some((&1, &1)));

        let err = heap
            .batch_enqueue_into(vec![(4, 4), (5, 5)], &mut buffer, 4)
            .unwrap_err();
        assert_eq!(
            err,
            DescriptorBufferTooSmallError {
                required: 6,
                available: 5
            }
        );
        assert_eq!(heap.len(), 4);
    }

    // Claims one entry less than it yields
    struct ShortLen(std::vec::IntoIter<(i32, i32)>);

    impl Iterator for ShortLen {
        type Item = (i32, i32);

        fn next(&mut self) -> Option<Self::Item> {
            self.0.next()
        }

        fn size_hint(&self) -> (usize, Option<usize>) {
            let len = self.0.len().saturating_sub(1);
            (len, Some(len))
        }
    }

    impl ExactSizeIterator for ShortLen {}

    #[test]
    fn test_batch_enqueue_into_uses_spare_buffer() {
        let mut heap = HandleHeap::new();
        let mut buffer = vec![None; 3];
        heap.batch_enqueue_into(ShortLen(vec![(2, 2), (1, 1)].into_iter()), &mut buffer, 0)
            .unwrap();
        assert_eq!(heap.len(), 2);
        assert_eq!(buffer[1], Some(Descriptor::new(1)));
        assert_valid(&heap);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Iterator yielded more entries than its len()")]
    fn test_batch_enqueue_into_detects_lying_len() {
        let mut heap = HandleHeap::new();
        let mut buffer = vec![None; 1];
        let _ = heap.batch_enqueue_into(ShortLen(vec![(2, 2), (1, 1)].into_iter()), &mut buffer, 0);
    }

    #[test]
    fn test_clear() {
        let mut heap = HandleHeap::new();
        assert!(!heap.clear());
        heap.enqueue("first", -30);
        heap.enqueue("third", -10);
        heap.enqueue("second", -20);
        assert!(!heap.is_empty());
        assert!(heap.clear());
        assert!(heap.is_empty());
        assert_eq!(heap.dequeue(), None);
        assert_eq!(heap.enqueue("again", 0), Descriptor::new(0));
    }

    #[test]
    fn test_for_each() {
        let heap: HandleHeap<i32, i32> = PRIORITIES.iter().map(|&x| (x, x)).collect();
        let mut visited = Vec::new();
        heap.for_each(|&element, &priority| {
            assert_eq!(element, priority);
            visited.push(element);
        });
        let expected: Vec<_> = heap.iter().map(|(&e, _)| e).collect();
        assert_eq!(visited, expected);
        visited.sort_unstable();
        assert_eq!(visited, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_into_iter() {
        let heap: HandleHeap<i32, i32, Descending> = PRIORITIES.iter().map(|&x| (x, x)).collect();
        let iter = heap.into_iter();
        assert_eq!(iter.len(), 10);
        let drained: Vec<_> = iter.map(|(e, _)| e).collect();
        assert_eq!(drained, (0..10).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_not_clone_works() {
        #[derive(PartialEq, Debug)]
        struct Task(u32);

        let mut heap = HandleHeap::new();
        for x in [4u32, 1, 3, 2] {
            heap.enqueue(Task(x), x);
        }
        assert!(heap.update(&Task(4), 0).is_some());
        assert!(heap.delete(&Task(3)));
        let order: Vec<_> = heap.into_iter().map(|(Task(x), _)| x).collect();
        assert_eq!(order, vec![4, 1, 2]);
    }

    #[test]
    fn test_fmt() {
        let mut heap = HandleHeap::new();
        heap.enqueue("second", 2);
        heap.enqueue("first", 1);
        assert_eq!(format!("{:?}", heap), "[(\"first\", 1)(\"second\", 2)]");
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HandleHeap<i32, i32>>();
    }
}
