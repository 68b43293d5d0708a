//! Core trait for cached entities.

use std::fmt::Debug;

/// Trait for entities that can live in a `ListStore`.
///
/// Implementors provide a stable identity used to find, patch and remove
/// entries without disturbing the order of the rest of the list.
pub trait Cacheable: Clone {
  type Key: PartialEq + Debug;

  /// Unique identifier for this entity (e.g. todo id)
  fn cache_key(&self) -> &Self::Key;
}
