//! Whole-graph search orders.
//!
//! Both iterators start from *every* vertex rather than a single root, so each
//! vertex of a finite graph is yielded exactly once even when the graph is
//! disconnected or cyclic.

use std::{collections::VecDeque, iter::FusedIterator};

use super::traits::{Adjacency, GraphIterator};

/// Depth-first order over all vertices.
///
/// The stack is seeded with every vertex in declaration order, so the vertex
/// declared last is yielded first. When a vertex is yielded, each unvisited
/// target of its outgoing edges is pulled out of its queued position and pushed
/// back on top, which makes it the next candidate instead of leaving it where an
/// earlier discoverer (or the seed) put it.
pub struct Dfs<'g, G: Adjacency> {
    graph: &'g G,
    visited: Vec<bool>,
    on_stack: Vec<bool>,
    stack: Vec<G::Vertex>,
}

impl<'g, G: Adjacency> Dfs<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        let n = graph.vertex_count();
        let stack: Vec<_> = graph.vertex_indices().collect();
        let mut on_stack = vec![false; n];
        for &v in &stack {
            on_stack[graph.dense_index(v)] = true;
        }
        Self {
            graph,
            visited: vec![false; n],
            on_stack,
            stack,
        }
    }

    /// False for vertices of another graph.
    pub fn is_visited(&self, v: G::Vertex) -> bool {
        self.graph.contains(v) && self.visited[self.graph.dense_index(v)]
    }
}

impl<'g, G: Adjacency> Iterator for Dfs<'g, G> {
    type Item = G::Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let graph = self.graph;
        let current = self.stack.pop()?;
        let idx = graph.dense_index(current);
        self.on_stack[idx] = false;
        // marked before the edges are examined so a self-loop cannot re-queue it
        self.visited[idx] = true;

        for adj in graph.adjacency(current) {
            let a = graph.dense_index(adj);
            if self.on_stack[a] {
                if let Some(pos) = self.stack.iter().rposition(|&v| v == adj) {
                    self.stack.remove(pos);
                }
                self.on_stack[a] = false;
            }
            if !self.visited[a] {
                self.stack.push(adj);
                self.on_stack[a] = true;
            }
        }

        tracing::trace!(vertex = ?current, pending = self.stack.len(), "dfs yield");
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // every unvisited vertex sits on the stack exactly once
        (self.stack.len(), Some(self.stack.len()))
    }
}

impl<'g, G: Adjacency> ExactSizeIterator for Dfs<'g, G> {}
impl<'g, G: Adjacency> FusedIterator for Dfs<'g, G> {}

impl<'g, G: Adjacency> GraphIterator for Dfs<'g, G> {
    fn has_next(&self) -> bool {
        !self.stack.is_empty()
    }
}

/// Breadth-first order over all vertices.
///
/// Roots are taken in declaration order; from each root that has not been
/// reached yet a FIFO sweep follows outgoing edges. Vertices are marked when
/// they are enqueued.
pub struct Bfs<'g, G: Adjacency> {
    graph: &'g G,
    discovered: Vec<bool>,
    queue: VecDeque<G::Vertex>,
    roots: std::vec::IntoIter<G::Vertex>,
    remaining: usize,
}

impl<'g, G: Adjacency> Bfs<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        let n = graph.vertex_count();
        let roots: Vec<_> = graph.vertex_indices().collect();
        Self {
            graph,
            discovered: vec![false; n],
            queue: VecDeque::new(),
            roots: roots.into_iter(),
            remaining: n,
        }
    }
}

impl<'g, G: Adjacency> Iterator for Bfs<'g, G> {
    type Item = G::Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let graph = self.graph;
        if self.queue.is_empty() {
            let discovered = &self.discovered;
            let root = self
                .roots
                .find(|&r| !discovered[graph.dense_index(r)])?;
            self.discovered[graph.dense_index(root)] = true;
            self.queue.push_back(root);
        }

        let current = self.queue.pop_front()?;
        self.queue.extend(graph.adjacency(current).filter(|&adj| {
            let a = graph.dense_index(adj);
            if self.discovered[a] {
                false
            } else {
                self.discovered[a] = true;
                true
            }
        }));
        self.remaining -= 1;

        tracing::trace!(vertex = ?current, queued = self.queue.len(), "bfs yield");
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'g, G: Adjacency> ExactSizeIterator for Bfs<'g, G> {}
impl<'g, G: Adjacency> FusedIterator for Bfs<'g, G> {}

impl<'g, G: Adjacency> GraphIterator for Bfs<'g, G> {
    fn has_next(&self) -> bool {
        self.remaining > 0
    }
}
