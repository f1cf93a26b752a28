//! Directed graphs with whole-graph depth-first and breadth-first walks.
//!
//! A [`Graph`] owns its vertices and edges in insertion order. [`Dfs`] and
//! [`Bfs`] yield every vertex exactly once, restarting on their own when part of
//! the graph is unreachable from where they began. A [`Traversal`] drives one of
//! those orders and hands each value to a [`Visitor`], stopping at the first
//! visitor error.

pub mod analysis;
pub mod builder;
pub mod error;
pub mod graph;
pub mod traversal;
pub mod visit;

pub use analysis::{
    Connected, DefaultRules, EdgeCount, GraphAnalyzer, GraphValidator, RuleBasedValidator,
    VertexCount, VerticesHaveEdges,
};
pub use builder::{EdgeStart, GraphBuilder};
pub use error::{GraphError, Result};
pub use graph::{
    meta::MetaTags,
    search::{Bfs, Dfs},
    traits::{Adjacency, GraphIterator},
    Edge, EdgeId, Graph, Vertex, VertexId,
};
pub use traversal::{Order, Traversal, TraversalState, TraversalStrategy};
pub use visit::{visit_fn, Collect, VisitFn, Visitor};
