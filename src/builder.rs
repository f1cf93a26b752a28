//! Keyed, fluent graph construction.
//!
//! A [`GraphBuilder`] maps every vertex value to a key and never creates two
//! vertices for the same key, which makes it convenient to assemble a graph from
//! a stream of "a relates to b" facts:
//!
//! ```
//! use graph_walk::GraphBuilder;
//!
//! let mut builder = GraphBuilder::<&str, ()>::new();
//! builder.from("parse").to("check").from("check").to("emit");
//! builder.from("parse").to("check");
//! let graph = builder.build();
//!
//! assert_eq!(graph.vertex_count(), 3);
//! assert_eq!(graph.edge_count(), 2);
//! ```

use std::{
    collections::{HashMap, HashSet},
    fmt::Debug,
    hash::Hash,
};

use tracing::debug;

use crate::{
    error::{GraphError, Result},
    graph::{meta::MetaTags, Edge, EdgeId, Graph, Vertex, VertexId},
};

type KeyFn<V, K> = Box<dyn Fn(&V) -> K>;
type BuildCallback<V, E> = Box<dyn FnOnce(&Graph<V, E>)>;

pub struct GraphBuilder<V, E, K = V> {
    graph: Graph<V, E>,
    key_of: KeyFn<V, K>,
    keys: HashMap<K, VertexId>,
    callbacks: Vec<BuildCallback<V, E>>,
}

impl<V, E> GraphBuilder<V, E, V>
where
    V: Clone + Eq + Hash + Debug + 'static,
{
    /// A builder that uses (a clone of) the value itself as its key.
    pub fn new() -> Self {
        Self::with_key(V::clone)
    }
}

impl<V, E> Default for GraphBuilder<V, E, V>
where
    V: Clone + Eq + Hash + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E, K> GraphBuilder<V, E, K>
where
    K: Eq + Hash + Debug,
{
    pub fn with_key(key_of: impl Fn(&V) -> K + 'static) -> Self {
        Self {
            graph: Graph::new(),
            key_of: Box::new(key_of),
            keys: HashMap::new(),
            callbacks: Vec::new(),
        }
    }

    /// The graph assembled so far.
    pub fn graph(&self) -> &Graph<V, E> {
        &self.graph
    }

    pub fn vertex_id(&self, key: &K) -> Option<VertexId> {
        self.keys.get(key).copied()
    }

    /// Returns the vertex registered under `value`'s key, adding it first if needed.
    /// When the key is already taken, `value` is dropped.
    pub fn get_or_add_vertex(&mut self, value: V) -> VertexId {
        let key = (self.key_of)(&value);
        if let Some(&id) = self.keys.get(&key) {
            return id;
        }
        let id = self.graph.add_vertex(value);
        self.keys.insert(key, id);
        id
    }

    pub fn add_vertex(&mut self, value: V) -> &mut Self {
        self.get_or_add_vertex(value);
        self
    }

    /// Adds `value` like [`GraphBuilder::add_vertex`], then hands the vertex to
    /// `with`, typically to attach meta tags. `with` also runs when the key was
    /// already registered, on the existing vertex.
    pub fn add_vertex_with(&mut self, value: V, with: impl FnOnce(&mut Vertex<V>)) -> &mut Self {
        let id = self.get_or_add_vertex(value);
        with(&mut self.graph[id]);
        self
    }

    /// Starts an edge at `value`'s vertex, adding the vertex if needed.
    pub fn from(&mut self, value: V) -> EdgeStart<'_, V, E, K> {
        let source = self.get_or_add_vertex(value);
        EdgeStart {
            builder: self,
            source,
        }
    }

    /// # Errors
    ///
    /// [`GraphError::UnknownKey`] if no vertex is registered under `key`.
    pub fn from_key(&mut self, key: &K) -> Result<EdgeStart<'_, V, E, K>> {
        let source = self.lookup(key)?;
        Ok(EdgeStart {
            builder: self,
            source,
        })
    }

    /// Moves the vertex registered under `old` to `new`.
    ///
    /// `apply` must change the vertex value so that it maps to `new`; it is
    /// handed the value and the new key.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DuplicateKey`] if `new` is taken; nothing changes.
    /// - [`GraphError::UnknownKey`] if `old` is not registered; nothing changes.
    /// - [`GraphError::KeyMismatch`] if the value does not map to `new` after
    ///   `apply`. The vertex then stays unregistered.
    pub fn update_key(&mut self, old: &K, new: K, apply: impl FnOnce(&mut V, &K)) -> Result<()> {
        if self.keys.contains_key(&new) {
            return Err(GraphError::DuplicateKey(format!("{new:?}")));
        }
        let id = self.lookup(old)?;
        self.keys.remove(old);

        let value = self.graph.vertex_value_mut(id)?;
        apply(&mut *value, &new);
        let found = (self.key_of)(&*value);
        if found != new {
            return Err(GraphError::KeyMismatch {
                expected: format!("{new:?}"),
                found: format!("{found:?}"),
            });
        }
        self.keys.insert(new, id);
        Ok(())
    }

    /// Copies every vertex and edge of `sub` into the graph under construction,
    /// together with their meta tags. The graph-level tags of `sub` are merged
    /// into the graph's own, replacing tags with the same key.
    ///
    /// Returns the new ids of `sub`'s vertices, in `sub`'s order.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateKey`] if a key of `sub` is already registered, or two
    /// of `sub`'s vertices share a key. The builder is left unchanged.
    pub fn add_subgraph(&mut self, sub: &Graph<V, E>) -> Result<Vec<VertexId>>
    where
        V: Clone,
        E: Clone,
    {
        let keys: Vec<K> = sub.values().map(|v| (self.key_of)(v)).collect();
        let mut fresh = HashSet::with_capacity(keys.len());
        for key in &keys {
            if self.keys.contains_key(key) || !fresh.insert(key) {
                return Err(GraphError::DuplicateKey(format!("{key:?}")));
            }
        }

        self.graph.meta_tags_mut().extend_from(sub.meta_tags());
        let mut ids = Vec::with_capacity(keys.len());
        for ((_, vertex), key) in sub.vertices().zip(keys) {
            let id = self
                .graph
                .push_vertex(vertex.value().clone(), vertex.meta_tags().clone());
            self.keys.insert(key, id);
            ids.push(id);
        }
        for (_, edge) in sub.edges() {
            let from = ids[edge.source().index()].index();
            let to = ids[edge.target().index()].index();
            self.graph.push_edge(
                from,
                to,
                edge.value().clone(),
                edge.weight(),
                edge.meta_tags().clone(),
            );
        }
        debug!(vertices = ids.len(), edges = sub.edge_count(), "sub-graph merged");
        Ok(ids)
    }

    /// Registers a callback that runs once with the finished graph.
    pub fn on_build(&mut self, callback: impl FnOnce(&Graph<V, E>) + 'static) -> &mut Self {
        self.callbacks.push(Box::new(callback));
        self
    }

    /// Finishes construction. Consuming the builder rules out later changes.
    pub fn build(self) -> Graph<V, E> {
        let graph = self.graph;
        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "graph built"
        );
        for callback in self.callbacks {
            callback(&graph);
        }
        graph
    }

    fn lookup(&self, key: &K) -> Result<VertexId> {
        self.vertex_id(key)
            .ok_or_else(|| GraphError::UnknownKey(format!("{key:?}")))
    }

    /// Adds `source -> target`, or bumps the weight of the existing edge by one.
    ///
    /// Both endpoints must have been minted by this builder's graph.
    fn connect(&mut self, source: VertexId, target: VertexId, data: E) -> EdgeId {
        let graph = &self.graph;
        let existing = graph[source]
            .outgoing()
            .iter()
            .copied()
            .find(|&e| graph[e].target() == target);
        if let Some(existing) = existing {
            let edge = &mut self.graph[existing];
            edge.set_weight(edge.weight() + 1.0);
            debug!(?source, ?target, weight = edge.weight(), "repeated edge, weight bumped");
            return existing;
        }
        self.graph
            .push_edge(source.index(), target.index(), data, 1.0, MetaTags::default())
    }
}

/// An edge whose source is fixed; pick its target to add it.
pub struct EdgeStart<'b, V, E, K> {
    builder: &'b mut GraphBuilder<V, E, K>,
    source: VertexId,
}

impl<'b, V, E, K> EdgeStart<'b, V, E, K>
where
    K: Eq + Hash + Debug,
{
    /// Ends the edge at `value`'s vertex (added if needed), with a default edge value.
    pub fn to(self, value: V) -> &'b mut GraphBuilder<V, E, K>
    where
        E: Default,
    {
        self.to_data(value, E::default())
    }

    /// # Errors
    ///
    /// [`GraphError::UnknownKey`] if no vertex is registered under `key`.
    pub fn to_key(self, key: &K) -> Result<&'b mut GraphBuilder<V, E, K>>
    where
        E: Default,
    {
        self.to_data_key(key, E::default())
    }

    pub fn to_data(self, value: V, data: E) -> &'b mut GraphBuilder<V, E, K> {
        self.to_with(value, data, |_| {})
    }

    /// # Errors
    ///
    /// [`GraphError::UnknownKey`] if no vertex is registered under `key`.
    pub fn to_data_key(self, key: &K, data: E) -> Result<&'b mut GraphBuilder<V, E, K>> {
        let target = self.builder.lookup(key)?;
        self.builder.connect(self.source, target, data);
        Ok(self.builder)
    }

    /// Like [`EdgeStart::to_data`], then hands the (new or reinforced) edge to `with`.
    pub fn to_with(self, value: V, data: E, with: impl FnOnce(&mut Edge<E>)) -> &'b mut GraphBuilder<V, E, K> {
        let builder = self.builder;
        let target = builder.get_or_add_vertex(value);
        let id = builder.connect(self.source, target, data);
        with(&mut builder.graph[id]);
        builder
    }
}

#[cfg(test)]
mod test {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Task {
        id: u32,
        name: &'static str,
    }

    #[test]
    fn test_get_or_add_vertex_reuses_key() {
        let mut builder = GraphBuilder::<&str, ()>::new();
        let a = builder.get_or_add_vertex("a");
        assert_eq!(builder.get_or_add_vertex("a"), a);
        builder.add_vertex("b").add_vertex("a");
        assert_eq!(builder.graph().vertex_count(), 2);
        assert_eq!(builder.vertex_id(&"b").map(|id| id.index()), Some(1));
    }

    #[test]
    fn test_repeated_edge_bumps_weight() {
        let mut builder = GraphBuilder::<char, &str>::new();
        builder.from('a').to_data('b', "first");
        builder.from('a').to_data('b', "second");
        builder.from('b').to('a');
        let graph = builder.build();

        assert_eq!(graph.edge_count(), 2);
        let (_, ab) = graph.edges().next().unwrap();
        assert_eq!(*ab.value(), "first");
        assert_eq!(ab.weight(), 2.0);
        let (_, ba) = graph.edges().nth(1).unwrap();
        assert_eq!(*ba.value(), "");
        assert_eq!(ba.weight(), 1.0);
    }

    #[test]
    fn test_custom_key_and_key_lookups() {
        let mut builder = GraphBuilder::<Task, u8, u32>::with_key(|t: &Task| t.id);
        builder.add_vertex(Task { id: 1, name: "fetch" });
        builder.add_vertex(Task { id: 2, name: "build" });
        builder.from_key(&1).unwrap().to_key(&2).unwrap();
        builder.from_key(&2).unwrap().to_data_key(&1, 9).unwrap();

        assert_eq!(
            builder.from_key(&7).err(),
            Some(GraphError::UnknownKey("7".to_owned()))
        );
        assert_eq!(
            builder.from_key(&1).unwrap().to_key(&8).err(),
            Some(GraphError::UnknownKey("8".to_owned()))
        );

        let graph = builder.build();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.values().map(|t| t.name).collect::<Vec<_>>(), vec!["fetch", "build"]);
    }

    #[test]
    fn test_to_with_sees_the_edge() {
        let mut builder = GraphBuilder::<u8, u8>::new();
        builder.from(1).to_with(2, 5, |edge| edge.set_weight(0.5));
        builder.from(1).to_with(2, 6, |edge| *edge.value_mut() += 1);
        let graph = builder.build();
        let (_, edge) = graph.edges().next().unwrap();
        assert_eq!(*edge.value(), 6);
        assert_eq!(edge.weight(), 1.5);
    }

    #[test]
    fn test_to_with_reports_each_edge_once_per_call() {
        let mut builder = GraphBuilder::<u8, ()>::new();
        let mut calls = Vec::new();
        builder.from(1).to_with(1, (), |edge| calls.push((edge.is_self_loop(), edge.weight())));
        builder.from(1).to_with(2, (), |edge| calls.push((edge.is_self_loop(), edge.weight())));
        builder.from(1).to_with(1, (), |edge| calls.push((edge.is_self_loop(), edge.weight())));
        assert_eq!(calls, vec![(true, 1.0), (false, 1.0), (true, 2.0)]);
        assert_eq!(builder.graph().edge_count(), 2);
    }

    #[test]
    fn test_add_vertex_with_tags_new_and_existing_vertex() {
        let mut builder = GraphBuilder::<&str, ()>::new();
        builder
            .add_vertex_with("a", |v| {
                v.meta_tags_mut().insert("seen", 1u32);
            })
            .add_vertex_with("a", |v| {
                let seen = v.meta_tags().get::<u32>("seen").copied().unwrap_or(0);
                v.meta_tags_mut().insert("seen", seen + 1);
            });
        let graph = builder.build();
        assert_eq!(graph.vertex_count(), 1);
        let a = graph.vertex_ids().next().unwrap();
        assert_eq!(graph[a].meta_tags().get::<u32>("seen"), Some(&2));
    }

    #[test]
    fn test_update_key() {
        let mut builder = GraphBuilder::<Task, (), u32>::with_key(|t: &Task| t.id);
        builder.add_vertex(Task { id: 1, name: "a" });
        builder.add_vertex(Task { id: 2, name: "b" });

        assert_eq!(
            builder.update_key(&1, 2, |t, k| t.id = *k),
            Err(GraphError::DuplicateKey("2".to_owned()))
        );
        assert_eq!(
            builder.update_key(&5, 6, |t, k| t.id = *k),
            Err(GraphError::UnknownKey("5".to_owned()))
        );
        builder.update_key(&1, 10, |t, k| t.id = *k).unwrap();
        assert!(builder.vertex_id(&1).is_none());
        assert_eq!(builder.vertex_id(&10).map(|id| id.index()), Some(0));

        let err = builder.update_key(&2, 20, |_, _| {}).unwrap_err();
        assert_eq!(
            err,
            GraphError::KeyMismatch {
                expected: "20".to_owned(),
                found: "2".to_owned()
            }
        );
    }

    #[test]
    fn test_add_subgraph() {
        let mut sub = Graph::new();
        let x = sub.add_vertex("x");
        let y = sub.add_vertex("y");
        let xy = sub.add_edge(x, y, 3).unwrap();
        sub.edge_mut(xy).unwrap().set_weight(2.5);
        sub.edge_mut(xy).unwrap().meta_tags_mut().insert("kind", "call");
        sub.vertex_mut(y).unwrap().meta_tags_mut().insert("leaf", true);
        sub.meta_tags_mut().insert("origin", "module-x");

        let mut builder = GraphBuilder::<&str, i32>::new();
        builder.from("root").to_data("x-less", 1);
        let ids = builder.add_subgraph(&sub).unwrap();
        builder.from("root").to_data("x", 0);

        let graph = builder.build();
        assert_eq!(ids.len(), 2);
        assert_eq!(*graph[ids[0]].value(), "x");
        let edge = graph.find_edge(ids[0], ids[1]).unwrap().unwrap();
        assert_eq!(*graph[edge].value(), 3);
        assert_eq!(graph[edge].weight(), 2.5);
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph[edge].meta_tags().get::<&str>("kind"), Some(&"call"));
        assert_eq!(graph[ids[1]].meta_tags().get::<bool>("leaf"), Some(&true));
        assert!(graph[ids[0]].meta_tags().is_empty());
        assert_eq!(graph.meta_tags().get::<&str>("origin"), Some(&"module-x"));
    }

    #[test]
    fn test_add_subgraph_rejects_colliding_keys() {
        let mut builder = GraphBuilder::<&str, ()>::new();
        builder.add_vertex("x");

        let mut sub = Graph::new();
        sub.add_vertex("x");
        assert_eq!(
            builder.add_subgraph(&sub),
            Err(GraphError::DuplicateKey("\"x\"".to_owned()))
        );

        let mut twins = Graph::new();
        twins.add_vertex("t");
        twins.add_vertex("t");
        assert!(builder.add_subgraph(&twins).is_err());
        assert_eq!(builder.graph().vertex_count(), 1);
    }

    #[test]
    fn test_on_build_callbacks_run_once() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let mut builder = GraphBuilder::<i32, ()>::new();
        builder
            .add_vertex(1)
            .on_build(move |graph| seen.set(seen.get() + graph.vertex_count()));
        assert_eq!(calls.get(), 0);
        builder.build();
        assert_eq!(calls.get(), 1);
    }
}
