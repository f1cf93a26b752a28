//! Keyed, typed annotations carried by graphs, vertices and edges.

use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::Arc,
};

type TagValue = Arc<dyn Any + Send + Sync>;

/// A map from string keys to values of any `'static` type.
///
/// Lookups name the expected type; a tag stored under the key with a different
/// type reads as absent. Values are shared, so copying tags into another graph
/// does not clone them.
#[derive(Clone, Default)]
pub struct MetaTags {
    tags: HashMap<String, TagValue>,
}

impl MetaTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous tag. Returns `true` if
    /// the key was not in use.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) -> bool {
        self.tags.insert(key.into(), Arc::new(value)).is_none()
    }

    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.tags.get(key)?.downcast_ref()
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.tags.remove(key).is_some()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.tags.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Copies every tag of `other` in, overwriting tags with the same key.
    pub fn extend_from(&mut self, other: &MetaTags) {
        self.tags
            .extend(other.tags.iter().map(|(k, v)| (k.clone(), Arc::clone(v))));
    }
}

impl fmt::Debug for MetaTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.tags.keys()).finish()
    }
}
