use std::fmt::{Debug, Display};

/// Stable reference to entry of [`HandleHeap`].
///
/// Descriptor stays the same while entry moves around the heap
/// and becomes invalid when entry leaves it.
/// Released descriptors are reused by next enqueued entries,
/// so stale descriptor may point to some other element.
///
/// It is logic error to use descriptor with heap which didn't issue it.
///
/// [`HandleHeap`]: struct.HandleHeap.html
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct Descriptor(usize);

impl Descriptor {
    #[inline(always)]
    pub fn as_usize(self) -> usize {
        self.0
    }

    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn new(v: usize) -> Self {
        Self(v)
    }
}

impl Display for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Display::fmt(&self.0, f)
    }
}

// Maps descriptors to heap slots and recycles released descriptors
#[derive(Clone, Default)]
pub(crate) struct DescriptorTable {
    slots: Vec<Option<usize>>,
    released: Vec<Descriptor>,
}

impl DescriptorTable {
    #[inline(always)]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            released: Vec::new(),
        }
    }

    #[inline(always)]
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    // Takes last released descriptor or mints new one.
    // When nothing is released all minted descriptors are live
    // so new one equals to number of entries in heap.
    #[inline(always)]
    pub(crate) fn acquire(&mut self, slot: usize) -> Descriptor {
        match self.released.pop() {
            Some(descriptor) => {
                debug_assert!(self.slots[descriptor.0].is_none());
                self.slots[descriptor.0] = Some(slot);
                descriptor
            }
            None => {
                let descriptor = Descriptor(self.slots.len());
                self.slots.push(Some(slot));
                descriptor
            }
        }
    }

    #[inline(always)]
    pub(crate) fn release(&mut self, descriptor: Descriptor) {
        debug_assert!(
            self.slots[descriptor.0].is_some(),
            "Released descriptor {} twice",
            descriptor
        );
        self.slots[descriptor.0] = None;
        self.released.push(descriptor);
    }

    #[inline(always)]
    pub(crate) fn relink(&mut self, descriptor: Descriptor, slot: usize) {
        debug_assert!(self.slots[descriptor.0].is_some());
        self.slots[descriptor.0] = Some(slot);
    }

    #[inline(always)]
    pub(crate) fn slot_of(&self, descriptor: Descriptor) -> Option<usize> {
        self.slots.get(descriptor.0).copied().flatten()
    }

    // Number of live descriptors
    #[inline(always)]
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.released.len()
    }

    #[inline(always)]
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.released.clear();
    }
}

impl Debug for DescriptorTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "{{slots: {:?}, released: {:?}}}",
            &self.slots, &self.released
        )
    }
}
