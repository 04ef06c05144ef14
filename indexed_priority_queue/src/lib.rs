//! This is priority queue that supports priority modification and early removal
//! of any enqueued entry in ***O(log n)***.
//!
//! Two flavours of binary heap are provided:
//!
//! * [`HandleHeap`] stores elements of any type and returns [`Descriptor`] for each
//! enqueued entry. Descriptor is stable handle which can be used later to check,
//! update or delete entry without searching for it.
//! * [`IntrusiveHeap`] stores elements implementing [`HeapElement`] trait.
//! Such elements keep their position and priority inside themselves so no
//! side tables are needed. [`QueueItem`] is ready to use implementation.
//!
//! Order is defined by [`Comparator`]: entry ranked first is dequeued first.
//! By default [`Ascending`] is used so heaps are min-heaps.
//! Use [`Descending`] or any closure `Fn(&P, &P) -> Ordering` for other orders.
//!
//! Dequeue, enqueue, update and delete by handle have ***O(log n)***
//! time complexity; peek and membership check by handle are ***O(1)***.
//! Batch enqueue of `k` entries builds heap in ***O(n + k)***.
//!
//! # Examples
//!
//! This is implementation of [Dijkstra's algorithm][dijkstra] for weighted graph.
//! When shorter path to vertex in open set is found, its priority
//! is decreased using descriptor saved during enqueue.
//!
//! [dijkstra]: https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm
//! [`HandleHeap`]: struct.HandleHeap.html
//! [`Descriptor`]: struct.Descriptor.html
//! [`IntrusiveHeap`]: struct.IntrusiveHeap.html
//! [`HeapElement`]: trait.HeapElement.html
//! [`QueueItem`]: struct.QueueItem.html
//! [`Comparator`]: trait.Comparator.html
//! [`Ascending`]: struct.Ascending.html
//! [`Descending`]: struct.Descending.html
//!
//! ```
//! use indexed_priority_queue::{Descriptor, HandleHeap};
//!
//! struct Graph {
//!     // For every vertex: list of (neighbour, edge cost)
//!     edges: Vec<Vec<(usize, u32)>>,
//! }
//!
//! fn shortest_paths(graph: &Graph, start: usize) -> Vec<Option<u32>> {
//!     let count = graph.edges.len();
//!     let mut distances: Vec<Option<u32>> = vec![None; count];
//!     // Descriptors of vertices which are still in open set
//!     let mut handles: Vec<Option<Descriptor>> = vec![None; count];
//!     let mut done = vec![false; count];
//!
//!     let mut open = HandleHeap::with_capacity(count);
//!     distances[start] = Some(0);
//!     handles[start] = Some(open.enqueue(start, 0));
//!
//!     while let Some((vertex, distance)) = open.dequeue_entry() {
//!         handles[vertex] = None;
//!         done[vertex] = true;
//!         for &(next, cost) in graph.edges[vertex].iter() {
//!             if done[next] {
//!                 continue;
//!             }
//!             let candidate = distance + cost;
//!             match (distances[next], handles[next]) {
//!                 (Some(known), _) if known <= candidate => {}
//!                 (_, Some(handle)) => {
//!                     // Have found shorter path to vertex in open set
//!                     distances[next] = Some(candidate);
//!                     handles[next] = open.update_descriptor(&next, candidate, handle);
//!                 }
//!                 (_, None) => {
//!                     distances[next] = Some(candidate);
//!                     handles[next] = Some(open.enqueue(next, candidate));
//!                 }
//!             }
//!         }
//!     }
//!     distances
//! }
//!
//! let graph = Graph {
//!     edges: vec![
//!         vec![(1, 7), (2, 9), (5, 14)],
//!         vec![(0, 7), (2, 10), (3, 15)],
//!         vec![(0, 9), (1, 10), (3, 11), (5, 2)],
//!         vec![(1, 15), (2, 11), (4, 6)],
//!         vec![(3, 6), (5, 9)],
//!         vec![(0, 14), (2, 2), (4, 9)],
//!         vec![],
//!     ],
//! };
//!
//! assert_eq!(
//!     shortest_paths(&graph, 0),
//!     vec![Some(0), Some(7), Some(9), Some(20), Some(20), Some(11), None]
//! );
//! ```
//!

mod comparator;
mod descriptors;
mod error;
mod handle_heap;
mod intrusive_heap;
mod sift;

pub use crate::comparator::{Ascending, Comparator, Descending};
pub use crate::descriptors::Descriptor;
pub use crate::error::DescriptorBufferTooSmallError;
pub use crate::handle_heap::{HandleHeap, HandleHeapIntoIter, HandleHeapIter};
pub use crate::intrusive_heap::{HeapElement, IntrusiveHeap, QueueItem};

#[doc = include_str!("../../Readme.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
