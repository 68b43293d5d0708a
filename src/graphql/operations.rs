//! The four GraphQL documents the checklist sends, with typed variables.

use serde::{de::DeserializeOwned, Serialize};

use super::api_types::{DeleteTodosData, InsertTodosData, NoVariables, TodosData, UpdateTodosData};
use super::types::TodoId;

/// A named GraphQL document with its variable and response shapes
pub trait Operation {
  /// Operation name, sent as `operationName`
  const NAME: &'static str;
  const DOCUMENT: &'static str;

  type Variables: Serialize + Send;
  type Data: DeserializeOwned;
}

pub struct GetTodos;

impl Operation for GetTodos {
  const NAME: &'static str = "getTodos";
  const DOCUMENT: &'static str = r#"
query getTodos {
  todos {
    done
    id
    text
  }
}
"#;

  type Variables = NoVariables;
  type Data = TodosData;
}

pub struct ToggleTodo;

#[derive(Debug, Serialize)]
pub struct ToggleTodoVariables {
  pub id: TodoId,
  pub done: bool,
}

impl Operation for ToggleTodo {
  const NAME: &'static str = "toggletodo";
  const DOCUMENT: &'static str = r#"
mutation toggletodo($id: uuid!, $done: Boolean) {
  update_todos(where: { id: { _eq: $id } }, _set: { done: $done }) {
    returning {
      done
      id
      text
    }
  }
}
"#;

  type Variables = ToggleTodoVariables;
  type Data = UpdateTodosData;
}

pub struct AddTodo;

#[derive(Debug, Serialize)]
pub struct AddTodoVariables {
  pub text: String,
}

impl Operation for AddTodo {
  const NAME: &'static str = "addtodo";
  const DOCUMENT: &'static str = r#"
mutation addtodo($text: String!) {
  insert_todos(objects: { text: $text }) {
    returning {
      done
      id
      text
    }
  }
}
"#;

  type Variables = AddTodoVariables;
  type Data = InsertTodosData;
}

pub struct DeleteTodo;

#[derive(Debug, Serialize)]
pub struct DeleteTodoVariables {
  pub id: TodoId,
}

impl Operation for DeleteTodo {
  const NAME: &'static str = "delete_todo";
  const DOCUMENT: &'static str = r#"
mutation delete_todo($id: uuid!) {
  delete_todos(where: { id: { _eq: $id } }) {
    returning {
      id
      text
    }
  }
}
"#;

  type Variables = DeleteTodoVariables;
  type Data = DeleteTodosData;
}

#[cfg(test)]
mod tests {
  use super::*;

  /// The operation name must match the name declared inside the document.
  fn declares_own_name<O: Operation>() -> bool {
    O::DOCUMENT
      .split_whitespace()
      .nth(1)
      .map(|name| name.split('(').next() == Some(O::NAME))
      .unwrap_or(false)
  }

  #[test]
  fn test_documents_declare_their_names() {
    assert!(declares_own_name::<GetTodos>());
    assert!(declares_own_name::<ToggleTodo>());
    assert!(declares_own_name::<AddTodo>());
    assert!(declares_own_name::<DeleteTodo>());
  }

  #[test]
  fn test_toggle_variables_shape() {
    let vars = ToggleTodoVariables {
      id: TodoId::new("42"),
      done: true,
    };
    assert_eq!(
      serde_json::to_value(vars).unwrap(),
      serde_json::json!({ "id": "42", "done": true })
    );
  }
}
