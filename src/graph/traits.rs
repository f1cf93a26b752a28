use std::fmt::Debug;

use crate::error::{GraphError, Result};

/// Read access to a directed graph's structure, enough to drive a search.
///
/// Vertices must map onto a dense index range `0..vertex_count()` so searches can
/// keep their bookkeeping in plain vectors.
pub trait Adjacency {
    type Vertex: Copy + Eq + Debug;

    fn vertex_count(&self) -> usize;
    /// Whether `v` belongs to this graph.
    fn contains(&self, v: Self::Vertex) -> bool;
    /// Every vertex, in the order the graph declares them.
    fn vertex_indices(&self) -> impl Iterator<Item = Self::Vertex>;
    fn dense_index(&self, v: Self::Vertex) -> usize;
    /// Targets of `v`'s outgoing edges, in edge insertion order.
    fn adjacency(&self, v: Self::Vertex) -> impl Iterator<Item = Self::Vertex>;
}

/// A forward-only, single-pass walk over the vertices of a graph.
///
/// On top of the native [`Iterator`] protocol this exposes the explicit
/// "has more / get next / fail when exhausted" shape.
pub trait GraphIterator: Iterator {
    fn has_next(&self) -> bool;

    /// # Errors
    ///
    /// [`GraphError::EndOfIteration`] once [`GraphIterator::has_next`] reports false.
    fn try_next(&mut self) -> Result<Self::Item> {
        self.next().ok_or(GraphError::EndOfIteration)
    }
}
