//! Serde types matching the GraphQL wire format.
//!
//! Request envelopes and the `data` payload of each operation live here so
//! the domain types in `types` stay free of transport details.

use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};

use super::types::{Todo, TodoId};

// ============================================================================
// Envelopes
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a, V> {
  pub query: &'a str,
  #[serde(rename = "operationName")]
  pub operation_name: &'a str,
  pub variables: V,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
  pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
  pub data: Option<T>,
  #[serde(default)]
  pub errors: Vec<GraphqlError>,
}

impl<T> GraphqlResponse<T> {
  /// Extract `data`, treating any reported error as a failure of the whole operation.
  pub fn into_data(self, operation: &str) -> Result<T> {
    if !self.errors.is_empty() {
      let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
      return Err(eyre!("{} failed: {}", operation, messages.join("; ")));
    }

    self
      .data
      .ok_or_else(|| eyre!("{} returned no data", operation))
  }
}

// ============================================================================
// Operation payloads
// ============================================================================

#[derive(Debug, Serialize)]
pub struct NoVariables {}

#[derive(Debug, Deserialize)]
pub struct TodosData {
  pub todos: Vec<Todo>,
}

#[derive(Debug, Deserialize)]
pub struct Returning<T> {
  pub returning: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodosData {
  pub update_todos: Option<Returning<Todo>>,
}

#[derive(Debug, Deserialize)]
pub struct InsertTodosData {
  pub insert_todos: Option<Returning<Todo>>,
}

/// Deleted rows only carry `id` and `text`
#[derive(Debug, Deserialize)]
pub struct ApiDeletedTodo {
  pub id: TodoId,
}

#[derive(Debug, Deserialize)]
pub struct DeleteTodosData {
  pub delete_todos: Option<Returning<ApiDeletedTodo>>,
}
