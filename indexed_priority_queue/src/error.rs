use std::fmt::Display;

/// This is error type for [`batch_enqueue_into`] method of [`HandleHeap`].
/// It means that buffer cannot hold descriptors of all entries
/// starting from given offset. Heap is left untouched in this case.
///
/// [`HandleHeap`]: struct.HandleHeap.html
/// [`batch_enqueue_into`]: struct.HandleHeap.html#method.batch_enqueue_into
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct DescriptorBufferTooSmallError {
    /// Length which buffer must have, offset included.
    pub required: usize,
    /// Actual length of buffer.
    pub available: usize,
}

impl Display for DescriptorBufferTooSmallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "Descriptor buffer of length {} is too small, {} required",
            self.available, self.required
        )
    }
}

impl std::error::Error for DescriptorBufferTooSmallError {}
