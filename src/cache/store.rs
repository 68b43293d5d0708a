//! Ordered in-memory store holding the last known query result.

use super::traits::Cacheable;

/// Ordered list of entities keyed by `Cacheable::cache_key`.
///
/// Order is whatever the last `replace_all` delivered; no operation here
/// re-sorts, and removals keep the relative order of the survivors.
#[derive(Debug, Clone)]
pub struct ListStore<T> {
  entries: Vec<T>,
  loaded: bool,
}

impl<T> Default for ListStore<T> {
  fn default() -> Self {
    Self {
      entries: Vec::new(),
      loaded: false,
    }
  }
}

impl<T: Cacheable> ListStore<T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replace the whole cached list with a fresh query result.
  pub fn replace_all(&mut self, entries: Vec<T>) {
    self.entries = entries;
    self.loaded = true;
  }

  /// Remove the entry with the given key.
  pub fn remove_by_id(&mut self, key: &T::Key) -> Option<T> {
    let idx = self.position(key)?;
    Some(self.entries.remove(idx))
  }

  /// Apply `f` to the entry with the given key. Returns false if absent.
  pub fn patch_by_id<F>(&mut self, key: &T::Key, f: F) -> bool
  where
    F: FnOnce(&mut T),
  {
    match self.entries.iter_mut().find(|e| e.cache_key() == key) {
      Some(entry) => {
        f(entry);
        true
      }
      None => false,
    }
  }

  /// Replace the entry with the same key in place, or append it.
  ///
  /// Returns true if an existing entry was replaced.
  pub fn upsert(&mut self, entity: T) -> bool {
    match self.position(entity.cache_key()) {
      Some(idx) => {
        self.entries[idx] = entity;
        true
      }
      None => {
        self.entries.push(entity);
        false
      }
    }
  }

  pub fn get(&self, key: &T::Key) -> Option<&T> {
    self.entries.iter().find(|e| e.cache_key() == key)
  }

  pub fn contains(&self, key: &T::Key) -> bool {
    self.position(key).is_some()
  }

  pub fn items(&self) -> &[T] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Whether a query result has been stored at least once
  pub fn is_loaded(&self) -> bool {
    self.loaded
  }

  fn position(&self, key: &T::Key) -> Option<usize> {
    self.entries.iter().position(|e| e.cache_key() == key)
  }
}
