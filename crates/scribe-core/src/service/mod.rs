//! [`BlogService`]: the article aggregation service.
//!
//! Each operation is one request/response cycle: resolve targets through the
//! store, mutate, then re-read and project for the viewer. The viewer is
//! always an explicit argument.

mod articles;
mod comments;
mod profiles;

use std::sync::Arc;

/// Orchestrates the graph store and the social projector.
///
/// Cloning is cheap; the store is reference-counted.
pub struct BlogService<S> {
  store: Arc<S>,
}

impl<S> BlogService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// The underlying store, for account and session plumbing that has no
  /// projection logic.
  pub fn store(&self) -> &Arc<S> { &self.store }
}

impl<S> Clone for BlogService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}
