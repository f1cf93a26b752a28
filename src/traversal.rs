//! Whole-graph walks that feed vertex (and edge) values to visitors.

use tracing::debug;

use crate::{
    graph::{
        search::{Bfs, Dfs},
        Graph, Vertex, VertexId,
    },
    visit::Visitor,
};

/// Which search order a [`Traversal`] drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Order {
    #[default]
    DepthFirst,
    BreadthFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    NotStarted,
    InProgress,
    Completed,
    /// A visitor returned an error; whatever it did before that stays done.
    Failed,
}

/// Walks an entire graph, handing every element to caller-supplied visitors.
pub trait TraversalStrategy<V, E> {
    /// Visits the value of every vertex, in the order the strategy yields them.
    ///
    /// # Errors
    ///
    /// The first error returned by `vertex_visitor`, unchanged. The walk stops there.
    fn traverse<VV>(&mut self, vertex_visitor: &mut VV) -> Result<(), VV::Error>
    where
        VV: Visitor<V>;

    /// Visits each vertex value and then the values of its outgoing edges, in
    /// edge insertion order, before moving on to the next vertex.
    ///
    /// # Errors
    ///
    /// The first error returned by either visitor, unchanged.
    fn traverse_with_edges<VV, EV>(
        &mut self,
        vertex_visitor: &mut VV,
        edge_visitor: &mut EV,
    ) -> Result<(), VV::Error>
    where
        VV: Visitor<V>,
        EV: Visitor<E, Error = VV::Error>;

    fn state(&self) -> TraversalState;
}

/// The provided [`TraversalStrategy`]: binds a graph to a search [`Order`].
///
/// Every call builds a fresh iterator, so the same instance can walk its graph
/// again after it completed or failed.
#[derive(Debug)]
pub struct Traversal<'g, V, E> {
    graph: &'g Graph<V, E>,
    order: Order,
    state: TraversalState,
}

impl<'g, V, E> Traversal<'g, V, E> {
    pub fn new(graph: &'g Graph<V, E>, order: Order) -> Self {
        Self {
            graph,
            order,
            state: TraversalState::NotStarted,
        }
    }

    pub fn depth_first(graph: &'g Graph<V, E>) -> Self {
        Self::new(graph, Order::DepthFirst)
    }

    pub fn breadth_first(graph: &'g Graph<V, E>) -> Self {
        Self::new(graph, Order::BreadthFirst)
    }

    pub fn order(&self) -> Order {
        self.order
    }

    fn drive<Err>(
        &mut self,
        step: &mut impl FnMut(&'g Vertex<V>) -> Result<(), Err>,
    ) -> Result<(), Err> {
        let graph = self.graph;
        debug!(order = ?self.order, vertices = graph.vertex_count(), "traversal started");
        self.state = TraversalState::InProgress;

        let outcome = match self.order {
            Order::DepthFirst => walk(graph, Dfs::new(graph), step),
            Order::BreadthFirst => walk(graph, Bfs::new(graph), step),
        };
        match outcome {
            Ok(visited) => {
                self.state = TraversalState::Completed;
                debug!(visited, "traversal completed");
                Ok(())
            }
            Err((visited, err)) => {
                self.state = TraversalState::Failed;
                debug!(visited, "traversal aborted by visitor");
                Err(err)
            }
        }
    }
}

fn walk<'g, V, E, Err>(
    graph: &'g Graph<V, E>,
    order: impl Iterator<Item = VertexId>,
    step: &mut impl FnMut(&'g Vertex<V>) -> Result<(), Err>,
) -> Result<usize, (usize, Err)> {
    let mut visited = 0;
    for id in order {
        step(&graph[id]).map_err(|err| (visited, err))?;
        visited += 1;
    }
    Ok(visited)
}

impl<'g, V, E> TraversalStrategy<V, E> for Traversal<'g, V, E> {
    fn traverse<VV>(&mut self, vertex_visitor: &mut VV) -> Result<(), VV::Error>
    where
        VV: Visitor<V>,
    {
        self.drive(&mut |vertex: &'g Vertex<V>| vertex_visitor.visit(vertex.value()))
    }

    fn traverse_with_edges<VV, EV>(
        &mut self,
        vertex_visitor: &mut VV,
        edge_visitor: &mut EV,
    ) -> Result<(), VV::Error>
    where
        VV: Visitor<V>,
        EV: Visitor<E, Error = VV::Error>,
    {
        let graph = self.graph;
        self.drive(&mut |vertex: &'g Vertex<V>| {
            vertex_visitor.visit(vertex.value())?;
            for &edge in vertex.outgoing() {
                edge_visitor.visit(graph[edge].value())?;
            }
            Ok(())
        })
    }

    fn state(&self) -> TraversalState {
        self.state
    }
}
