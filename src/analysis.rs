//! Structural measurements over a graph, and validation rules built on them.

use tracing::debug;

use crate::graph::Graph;

/// Computes one property of a graph.
pub trait GraphAnalyzer<V, E> {
    type Output;

    fn analyze(&self, graph: &Graph<V, E>) -> Self::Output;
}

impl<V, E, R, F> GraphAnalyzer<V, E> for F
where
    F: Fn(&Graph<V, E>) -> R,
{
    type Output = R;

    fn analyze(&self, graph: &Graph<V, E>) -> R {
        self(graph)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VertexCount;

impl<V, E> GraphAnalyzer<V, E> for VertexCount {
    type Output = usize;

    fn analyze(&self, graph: &Graph<V, E>) -> usize {
        graph.vertex_count()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeCount;

impl<V, E> GraphAnalyzer<V, E> for EdgeCount {
    type Output = usize;

    fn analyze(&self, graph: &Graph<V, E>) -> usize {
        graph.edge_count()
    }
}

/// Whether every vertex can reach every other one when edge direction is
/// ignored. The empty graph does not count as connected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Connected;

impl<V, E> GraphAnalyzer<V, E> for Connected {
    type Output = bool;

    fn analyze(&self, graph: &Graph<V, E>) -> bool {
        let Some(start) = graph.vertex_ids().next() else {
            return false;
        };
        let mut reached = vec![false; graph.vertex_count()];
        let mut stack = vec![start];
        reached[start.index()] = true;
        let mut count = 1;
        while let Some(current) = stack.pop() {
            let vertex = &graph[current];
            let neighbours = vertex
                .outgoing()
                .iter()
                .map(|&e| graph[e].target())
                .chain(vertex.incoming().iter().map(|&e| graph[e].source()));
            for next in neighbours {
                if !reached[next.index()] {
                    reached[next.index()] = true;
                    count += 1;
                    stack.push(next);
                }
            }
        }
        count == graph.vertex_count()
    }
}

/// Whether every vertex has at least one incoming or outgoing edge. False for
/// the empty graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticesHaveEdges;

impl<V, E> GraphAnalyzer<V, E> for VerticesHaveEdges {
    type Output = bool;

    fn analyze(&self, graph: &Graph<V, E>) -> bool {
        !graph.is_empty()
            && graph
                .vertices()
                .all(|(_, v)| v.out_degree() + v.in_degree() > 0)
    }
}

pub trait GraphValidator<V, E> {
    fn is_valid(&self, graph: &Graph<V, E>) -> bool;
}

struct Rule<V, E> {
    name: String,
    check: Box<dyn Fn(&Graph<V, E>) -> bool>,
}

/// Valid when every registered rule holds; a validator without rules accepts
/// every graph.
pub struct RuleBasedValidator<V, E> {
    rules: Vec<Rule<V, E>>,
}

impl<V, E> Default for RuleBasedValidator<V, E> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<V, E> RuleBasedValidator<V, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule: `predicate` must accept what `analyzer` measures.
    pub fn add_rule<A, P>(&mut self, name: impl Into<String>, analyzer: A, predicate: P) -> &mut Self
    where
        A: GraphAnalyzer<V, E> + 'static,
        P: Fn(&A::Output) -> bool + 'static,
    {
        self.rules.push(Rule {
            name: name.into(),
            check: Box::new(move |graph| predicate(&analyzer.analyze(graph))),
        });
        self
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Names of the rules `graph` breaks, in registration order.
    pub fn violations(&self, graph: &Graph<V, E>) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|rule| !(rule.check)(graph))
            .map(|rule| rule.name.as_str())
            .collect()
    }
}

impl<V, E> GraphValidator<V, E> for RuleBasedValidator<V, E> {
    fn is_valid(&self, graph: &Graph<V, E>) -> bool {
        // stops at the first broken rule
        match self.rules.iter().find(|rule| !(rule.check)(graph)) {
            Some(rule) => {
                debug!(rule = %rule.name, "graph validation failed");
                false
            }
            None => true,
        }
    }
}

/// At least two vertices, at least one edge, and connected.
pub struct DefaultRules<V, E> {
    inner: RuleBasedValidator<V, E>,
}

impl<V: 'static, E: 'static> Default for DefaultRules<V, E> {
    fn default() -> Self {
        let mut inner = RuleBasedValidator::new();
        // a lone vertex pointing at itself does not count
        inner
            .add_rule("at least two vertices", VertexCount, |n: &usize| *n >= 2)
            .add_rule("at least one edge", EdgeCount, |n: &usize| *n >= 1)
            .add_rule("connected", Connected, |c: &bool| *c);
        Self { inner }
    }
}

impl<V: 'static, E: 'static> DefaultRules<V, E> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V, E> GraphValidator<V, E> for DefaultRules<V, E> {
    fn is_valid(&self, graph: &Graph<V, E>) -> bool {
        self.inner.is_valid(graph)
    }
}
