use thiserror::Error;

use crate::graph::{EdgeId, VertexId};

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// `try_next` was called on an iterator that has nothing left.
    #[error("graph iterator is exhausted")]
    EndOfIteration,

    #[error("vertex {0:?} does not belong to this graph")]
    InvalidVertex(VertexId),

    #[error("edge {0:?} does not belong to this graph")]
    InvalidEdge(EdgeId),

    #[error("no vertex is registered under key {0}")]
    UnknownKey(String),

    #[error("a vertex is already registered under key {0}")]
    DuplicateKey(String),

    /// A re-keying callback left the value mapping to some other key.
    #[error("value maps to key {found} after re-keying, expected {expected}")]
    KeyMismatch { expected: String, found: String },
}

impl GraphError {
    /// True for the errors raised when an id points outside the graph.
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::InvalidVertex(_) | Self::InvalidEdge(_))
    }
}
