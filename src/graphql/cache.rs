//! Caching glue for todo types.

use crate::cache::{Cacheable, ListStore};

use super::types::{Todo, TodoId};

impl Cacheable for Todo {
  type Key = TodoId;

  fn cache_key(&self) -> &TodoId {
    &self.id
  }
}

/// The cached todo list
pub type TodoStore = ListStore<Todo>;
