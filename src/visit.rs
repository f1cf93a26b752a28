//! Per-element callbacks handed to a traversal.

use std::convert::Infallible;

/// Receives one element of a walk.
///
/// An `Err` aborts the walk that is calling the visitor; the error comes back to
/// the caller of the traversal untouched.
pub trait Visitor<T: ?Sized> {
    type Error;

    fn visit(&mut self, value: &T) -> Result<(), Self::Error>;
}

impl<T, F, Err> Visitor<T> for F
where
    T: ?Sized,
    F: FnMut(&T) -> Result<(), Err>,
{
    type Error = Err;

    fn visit(&mut self, value: &T) -> Result<(), Err> {
        self(value)
    }
}

/// Adapts a closure that cannot fail.
pub struct VisitFn<F>(F);

pub fn visit_fn<F>(f: F) -> VisitFn<F> {
    VisitFn(f)
}

impl<T, F> Visitor<T> for VisitFn<F>
where
    T: ?Sized,
    F: FnMut(&T),
{
    type Error = Infallible;

    fn visit(&mut self, value: &T) -> Result<(), Infallible> {
        (self.0)(value);
        Ok(())
    }
}

/// Clones every visited value into a vector, in visit order.
#[derive(Debug, Clone)]
pub struct Collect<T> {
    items: Vec<T>,
}

impl<T> Default for Collect<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Collect<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl<T: Clone> Visitor<T> for Collect<T> {
    type Error = Infallible;

    fn visit(&mut self, value: &T) -> Result<(), Infallible> {
        self.items.push(value.clone());
        Ok(())
    }
}
