use super::{meta::MetaTags, Graph, VertexId};
use crate::error::Result;

impl<V: Clone, E: Clone> Graph<V, E> {
    /// Copies the selected vertices, and every edge running between two of them,
    /// into a new graph.
    ///
    /// Vertices keep the order of their first appearance in `selection`; edges keep
    /// their creation order and weight. Meta tags of the graph, the copied vertices
    /// and the copied edges come along. Duplicate ids are ignored.
    ///
    /// # Errors
    ///
    /// [`crate::GraphError::InvalidVertex`] if an id in `selection` belongs to
    /// another graph.
    pub fn induced_subgraph(&self, selection: &[VertexId]) -> Result<Graph<V, E>> {
        let mut mapping: Vec<Option<VertexId>> = vec![None; self.vertices.len()];
        let mut sub = Graph::with_capacity(selection.len(), 0);
        sub.meta.extend_from(&self.meta);
        for &id in selection {
            let index = self.check_vertex(id)?;
            if mapping[index].is_none() {
                let vertex = &self.vertices[index];
                mapping[index] = Some(sub.push_vertex(vertex.value.clone(), vertex.meta.clone()));
            }
        }

        for edge in &self.edges {
            if let (Some(source), Some(target)) =
                (mapping[edge.source.index], mapping[edge.target.index])
            {
                sub.push_edge(
                    source.index,
                    target.index,
                    edge.value.clone(),
                    edge.weight,
                    edge.meta.clone(),
                );
            }
        }
        Ok(sub)
    }
}

impl<V, E: Default> Graph<V, E> {
    /// Builds a graph over `values` with an edge `a -> b` for every ordered pair
    /// (including `a == b`) for which `connected(a, b)` holds.
    pub fn connect_by<I, P>(values: I, mut connected: P) -> Self
    where
        I: IntoIterator<Item = V>,
        P: FnMut(&V, &V) -> bool,
    {
        let mut graph = Graph::new();
        let ids: Vec<_> = values.into_iter().map(|v| graph.add_vertex(v)).collect();

        let mut pairs = Vec::new();
        for &from in &ids {
            for &to in &ids {
                if connected(&graph.vertices[from.index].value, &graph.vertices[to.index].value) {
                    pairs.push((from, to));
                }
            }
        }
        for (from, to) in pairs {
            graph.push_edge(from.index, to.index, E::default(), 1.0, MetaTags::default());
        }
        graph
    }
}
