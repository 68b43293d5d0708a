use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned todo identifier (a uuid on the wire, kept opaque here)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }
}

impl fmt::Display for TodoId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// A single todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
  pub id: TodoId,
  pub text: String,
  #[serde(default)]
  pub done: bool,
}

impl Todo {
  pub fn new(id: impl Into<String>, text: impl Into<String>, done: bool) -> Self {
    Self {
      id: TodoId::new(id),
      text: text.into(),
      done,
    }
  }
}
