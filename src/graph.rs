//! Arena-backed directed graph.
//!
//! Vertices and edges live in two flat vectors owned by [`Graph`]. Edges refer to
//! their endpoints by [`VertexId`], so the vertex → edge → vertex cycle never turns
//! into an ownership cycle. Every id carries the identity of the graph that minted
//! it; handing an id to another graph is rejected instead of silently aliasing.

pub mod meta;
pub mod search;
pub mod subgraph;
pub mod traits;

use std::{
    ops::{Index, IndexMut},
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    error::{GraphError, Result},
    traversal::{Order, Traversal, TraversalStrategy},
    visit::Visitor,
};

use meta::MetaTags;
use search::{Bfs, Dfs};
use traits::Adjacency;

static NEXT_GRAPH_TAG: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId {
    graph: u64,
    index: usize,
}

impl VertexId {
    /// Position of the vertex in its graph's insertion order.
    pub const fn index(self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId {
    graph: u64,
    index: usize,
}

impl EdgeId {
    pub const fn index(self) -> usize {
        self.index
    }
}

#[derive(Debug)]
pub struct Vertex<V> {
    value: V,
    outgoing: Vec<EdgeId>,
    incoming: Vec<EdgeId>,
    meta: MetaTags,
}

impl<V> Vertex<V> {
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Outgoing edges in the order they were added.
    pub fn outgoing(&self) -> &[EdgeId] {
        &self.outgoing
    }

    pub fn incoming(&self) -> &[EdgeId] {
        &self.incoming
    }

    pub fn out_degree(&self) -> usize {
        self.outgoing.len()
    }

    pub fn in_degree(&self) -> usize {
        self.incoming.len()
    }

    pub fn meta_tags(&self) -> &MetaTags {
        &self.meta
    }

    pub fn meta_tags_mut(&mut self) -> &mut MetaTags {
        &mut self.meta
    }
}

#[derive(Debug)]
pub struct Edge<E> {
    value: E,
    weight: f64,
    source: VertexId,
    target: VertexId,
    meta: MetaTags,
}

impl<E> Edge<E> {
    pub fn value(&self) -> &E {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut E {
        &mut self.value
    }

    /// Defaults to `1.0`; the builder bumps it when the same edge is declared again.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    pub fn source(&self) -> VertexId {
        self.source
    }

    pub fn target(&self) -> VertexId {
        self.target
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    pub fn meta_tags(&self) -> &MetaTags {
        &self.meta
    }

    pub fn meta_tags_mut(&mut self) -> &mut MetaTags {
        &mut self.meta
    }
}

/// A directed graph owning its vertices (in insertion order) and edges.
///
/// The graph is built incrementally with [`Graph::add_vertex`] and
/// [`Graph::add_edge`] and then read any number of times. Iterators and
/// traversals borrow the graph, so it cannot change underneath them.
#[derive(Debug)]
pub struct Graph<V, E> {
    tag: u64,
    vertices: Vec<Vertex<V>>,
    edges: Vec<Edge<E>>,
    meta: MetaTags,
}

impl<V, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> Graph<V, E> {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            tag: NEXT_GRAPH_TAG.fetch_add(1, Ordering::Relaxed),
            vertices: Vec::with_capacity(vertices),
            edges: Vec::with_capacity(edges),
            meta: MetaTags::default(),
        }
    }

    /// Tags attached to the graph as a whole.
    pub fn meta_tags(&self) -> &MetaTags {
        &self.meta
    }

    pub fn meta_tags_mut(&mut self) -> &mut MetaTags {
        &mut self.meta
    }

    pub fn add_vertex(&mut self, value: V) -> VertexId {
        self.push_vertex(value, MetaTags::default())
    }

    pub(crate) fn push_vertex(&mut self, value: V, meta: MetaTags) -> VertexId {
        let id = VertexId {
            graph: self.tag,
            index: self.vertices.len(),
        };
        self.vertices.push(Vertex {
            value,
            outgoing: Vec::new(),
            incoming: Vec::new(),
            meta,
        });
        id
    }

    /// Adds a directed edge `source -> target`.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidVertex`] if either endpoint was not created by this graph.
    /// The graph is left untouched in that case.
    pub fn add_edge(&mut self, source: VertexId, target: VertexId, value: E) -> Result<EdgeId> {
        let from = self.check_vertex(source)?;
        let to = self.check_vertex(target)?;
        Ok(self.push_edge(from, to, value, 1.0, MetaTags::default()))
    }

    /// Appends an edge between two vertex indices already known to be in range.
    pub(crate) fn push_edge(
        &mut self,
        from: usize,
        to: usize,
        value: E,
        weight: f64,
        meta: MetaTags,
    ) -> EdgeId {
        let id = EdgeId {
            graph: self.tag,
            index: self.edges.len(),
        };
        self.edges.push(Edge {
            value,
            weight,
            source: VertexId {
                graph: self.tag,
                index: from,
            },
            target: VertexId {
                graph: self.tag,
                index: to,
            },
            meta,
        });
        self.vertices[from].outgoing.push(id);
        self.vertices[to].incoming.push(id);
        id
    }

    /// Adds `a -> b` and `b -> a`, returning both edge ids in that order.
    pub fn add_undirected_edge(&mut self, a: VertexId, b: VertexId, value: E) -> Result<(EdgeId, EdgeId)>
    where
        E: Clone,
    {
        self.check_vertex(a)?;
        self.check_vertex(b)?;
        let forward = self.add_edge(a, b, value.clone())?;
        let backward = self.add_edge(b, a, value)?;
        Ok((forward, backward))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.check_vertex(id).is_ok()
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.check_edge(id).is_ok()
    }

    pub fn vertex(&self, id: VertexId) -> Result<&Vertex<V>> {
        let index = self.check_vertex(id)?;
        Ok(&self.vertices[index])
    }

    /// Mutable access to a vertex's value and tags. Its edges stay read-only.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut Vertex<V>> {
        let index = self.check_vertex(id)?;
        Ok(&mut self.vertices[index])
    }

    pub fn vertex_value_mut(&mut self, id: VertexId) -> Result<&mut V> {
        let index = self.check_vertex(id)?;
        Ok(&mut self.vertices[index].value)
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge<E>> {
        let index = self.check_edge(id)?;
        Ok(&self.edges[index])
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge<E>> {
        let index = self.check_edge(id)?;
        Ok(&mut self.edges[index])
    }

    /// All vertices in insertion order.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = (VertexId, &Vertex<V>)> + '_ {
        let tag = self.tag;
        self.vertices
            .iter()
            .enumerate()
            .map(move |(index, vertex)| (VertexId { graph: tag, index }, vertex))
    }

    pub fn vertex_ids(&self) -> impl ExactSizeIterator<Item = VertexId> + '_ {
        let tag = self.tag;
        (0..self.vertices.len()).map(move |index| VertexId { graph: tag, index })
    }

    /// All edges in creation order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = (EdgeId, &Edge<E>)> + '_ {
        let tag = self.tag;
        self.edges
            .iter()
            .enumerate()
            .map(move |(index, edge)| (EdgeId { graph: tag, index }, edge))
    }

    pub fn outgoing(&self, id: VertexId) -> Result<impl Iterator<Item = (EdgeId, &Edge<E>)> + '_> {
        let vertex = self.vertex(id)?;
        Ok(vertex.outgoing.iter().map(move |&e| (e, &self.edges[e.index])))
    }

    pub fn incoming(&self, id: VertexId) -> Result<impl Iterator<Item = (EdgeId, &Edge<E>)> + '_> {
        let vertex = self.vertex(id)?;
        Ok(vertex.incoming.iter().map(move |&e| (e, &self.edges[e.index])))
    }

    /// Sources of incoming edges followed by targets of outgoing edges, each
    /// vertex reported once.
    pub fn adjacent_vertices(&self, id: VertexId) -> Result<Vec<VertexId>> {
        let vertex = self.vertex(id)?;
        let mut seen = vec![false; self.vertices.len()];
        let mut adjacent = Vec::new();
        let sources = vertex.incoming.iter().map(|e| self.edges[e.index].source);
        let targets = vertex.outgoing.iter().map(|e| self.edges[e.index].target);
        for v in sources.chain(targets) {
            if !seen[v.index] {
                seen[v.index] = true;
                adjacent.push(v);
            }
        }
        Ok(adjacent)
    }

    /// First edge `source -> target`, if any.
    pub fn find_edge(&self, source: VertexId, target: VertexId) -> Result<Option<EdgeId>> {
        let vertex = self.vertex(source)?;
        self.check_vertex(target)?;
        Ok(vertex
            .outgoing
            .iter()
            .copied()
            .find(|e| self.edges[e.index].target == target))
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.vertices.iter().map(|v| &v.value)
    }

    pub fn dfs(&self) -> Dfs<'_, Self> {
        Dfs::new(self)
    }

    pub fn bfs(&self) -> Bfs<'_, Self> {
        Bfs::new(self)
    }

    /// Walks the whole graph in `order`, handing every vertex value to `visitor`.
    pub fn traverse<VV>(&self, order: Order, visitor: &mut VV) -> std::result::Result<(), VV::Error>
    where
        VV: Visitor<V>,
    {
        Traversal::new(self, order).traverse(visitor)
    }

    /// Like [`Graph::traverse`], additionally visiting each vertex's outgoing
    /// edge values right after the vertex itself.
    pub fn traverse_with_edges<VV, EV>(
        &self,
        order: Order,
        vertex_visitor: &mut VV,
        edge_visitor: &mut EV,
    ) -> std::result::Result<(), VV::Error>
    where
        VV: Visitor<V>,
        EV: Visitor<E, Error = VV::Error>,
    {
        Traversal::new(self, order).traverse_with_edges(vertex_visitor, edge_visitor)
    }

    pub(crate) fn check_vertex(&self, id: VertexId) -> Result<usize> {
        if id.graph == self.tag && id.index < self.vertices.len() {
            Ok(id.index)
        } else {
            Err(GraphError::InvalidVertex(id))
        }
    }

    pub(crate) fn check_edge(&self, id: EdgeId) -> Result<usize> {
        if id.graph == self.tag && id.index < self.edges.len() {
            Ok(id.index)
        } else {
            Err(GraphError::InvalidEdge(id))
        }
    }
}

impl<V, E> Index<VertexId> for Graph<V, E> {
    type Output = Vertex<V>;

    fn index(&self, id: VertexId) -> &Self::Output {
        match self.check_vertex(id) {
            Ok(index) => &self.vertices[index],
            Err(err) => panic!("{err}"),
        }
    }
}

impl<V, E> IndexMut<VertexId> for Graph<V, E> {
    fn index_mut(&mut self, id: VertexId) -> &mut Self::Output {
        match self.check_vertex(id) {
            Ok(index) => &mut self.vertices[index],
            Err(err) => panic!("{err}"),
        }
    }
}

impl<V, E> Index<EdgeId> for Graph<V, E> {
    type Output = Edge<E>;

    fn index(&self, id: EdgeId) -> &Self::Output {
        match self.check_edge(id) {
            Ok(index) => &self.edges[index],
            Err(err) => panic!("{err}"),
        }
    }
}

impl<V, E> IndexMut<EdgeId> for Graph<V, E> {
    fn index_mut(&mut self, id: EdgeId) -> &mut Self::Output {
        match self.check_edge(id) {
            Ok(index) => &mut self.edges[index],
            Err(err) => panic!("{err}"),
        }
    }
}

impl<V, E> Adjacency for Graph<V, E> {
    type Vertex = VertexId;

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertex_indices(&self) -> impl Iterator<Item = VertexId> {
        self.vertex_ids()
    }

    fn contains(&self, v: VertexId) -> bool {
        self.contains_vertex(v)
    }

    fn dense_index(&self, v: VertexId) -> usize {
        v.index
    }

    fn adjacency(&self, v: VertexId) -> impl Iterator<Item = VertexId> {
        self.vertices[v.index]
            .outgoing
            .iter()
            .map(move |e| self.edges[e.index].target)
    }
}

impl<V> FromIterator<V> for Graph<V, ()> {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        let mut graph = Graph::new();
        for value in iter {
            graph.add_vertex(value);
        }
        graph
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_vertices_keep_insertion_order() {
        let mut graph: Graph<&str, ()> = Graph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let c = graph.add_vertex("c");
        let ids: Vec<_> = graph.vertices().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(graph.values().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_edge_links_both_endpoints() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(1);
        let b = graph.add_vertex(2);
        let e = graph.add_edge(a, b, "ab").unwrap();

        assert_eq!(graph[a].outgoing(), &[e]);
        assert_eq!(graph[b].incoming(), &[e]);
        assert_eq!(graph[e].source(), a);
        assert_eq!(graph[e].target(), b);
        assert_eq!(*graph[e].value(), "ab");
        assert_eq!(graph[e].weight(), 1.0);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_add_edge_rejects_foreign_vertex() {
        let mut graph: Graph<i32, ()> = Graph::new();
        let mut other: Graph<i32, ()> = Graph::new();
        let a = graph.add_vertex(1);
        let foreign = other.add_vertex(1);

        let err = graph.add_edge(a, foreign, ()).unwrap_err();
        assert_eq!(err, GraphError::InvalidVertex(foreign));
        assert!(err.is_invalid_reference());
        let err = graph.add_edge(foreign, a, ()).unwrap_err();
        assert_eq!(err, GraphError::InvalidVertex(foreign));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph[a].outgoing().is_empty());
    }

    #[test]
    fn test_self_loop_is_legal() {
        let mut graph = Graph::new();
        let a = graph.add_vertex('a');
        let e = graph.add_edge(a, a, ()).unwrap();
        assert!(graph[e].is_self_loop());
        assert_eq!(graph[a].outgoing(), graph[a].incoming());
    }

    #[test]
    fn test_undirected_edge_is_two_directed_edges() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(0);
        let b = graph.add_vertex(1);
        let (ab, ba) = graph.add_undirected_edge(a, b, 7).unwrap();
        assert_eq!(graph.find_edge(a, b).unwrap(), Some(ab));
        assert_eq!(graph.find_edge(b, a).unwrap(), Some(ba));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_adjacent_vertices_are_distinct() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(0);
        let b = graph.add_vertex(1);
        let c = graph.add_vertex(2);
        graph.add_edge(b, a, ()).unwrap();
        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(a, c, ()).unwrap();
        assert_eq!(graph.adjacent_vertices(a).unwrap(), vec![b, c]);
    }

    #[test]
    fn test_lookups_reject_foreign_ids() {
        let graph: Graph<i32, i32> = Graph::new();
        let mut other: Graph<i32, i32> = Graph::new();
        let x = other.add_vertex(0);
        let e = other.add_edge(x, x, 0).unwrap();
        assert!(!graph.contains_vertex(x));
        assert!(!graph.contains_edge(e));
        assert_eq!(graph.edge(e).unwrap_err(), GraphError::InvalidEdge(e));
        assert!(graph.outgoing(x).is_err());
    }

    #[test]
    fn test_value_mut() {
        let mut graph: Graph<String, u8> = Graph::new();
        let a = graph.add_vertex("a".to_owned());
        graph.vertex_value_mut(a).unwrap().push('!');
        let e = graph.add_edge(a, a, 1).unwrap();
        *graph.edge_mut(e).unwrap().value_mut() += 1;
        assert_eq!(graph[a].value(), "a!");
        assert_eq!(*graph[e].value(), 2);
    }

    #[test]
    fn test_meta_tags_on_every_element() {
        let mut graph: Graph<&str, ()> = Graph::new();
        let a = graph.add_vertex("a");
        let e = graph.add_edge(a, a, ()).unwrap();
        graph.meta_tags_mut().insert("name", "demo");
        graph.vertex_mut(a).unwrap().meta_tags_mut().insert("depth", 2usize);
        graph[e].meta_tags_mut().insert("label", String::from("loop"));

        assert_eq!(graph.meta_tags().get::<&str>("name"), Some(&"demo"));
        assert_eq!(graph[a].meta_tags().get::<usize>("depth"), Some(&2));
        assert_eq!(
            graph[e].meta_tags().get::<String>("label").map(String::as_str),
            Some("loop")
        );
        assert!(graph[a].meta_tags().get::<usize>("label").is_none());

        let mut other: Graph<&str, ()> = Graph::new();
        let foreign = other.add_vertex("x");
        assert_eq!(graph.vertex_mut(foreign).unwrap_err(), GraphError::InvalidVertex(foreign));
    }

    #[test]
    fn test_from_iter() {
        let graph: Graph<u32, ()> = (0..4).collect();
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 0);
    }
}
