use crate::config::Config;
use crate::graphql::api_types::{GraphqlRequest, GraphqlResponse, NoVariables};
use crate::graphql::operations::{
  AddTodo, AddTodoVariables, DeleteTodo, DeleteTodoVariables, GetTodos, Operation, ToggleTodo,
  ToggleTodoVariables,
};
use crate::graphql::types::{Todo, TodoId};
use color_eyre::{eyre::eyre, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Todo operations the checklist depends on.
///
/// Implemented over HTTP by `GraphqlClient`; tests substitute a recording fake.
pub trait TodoApi: Clone + Send + Sync + 'static {
  /// Fetch the full list, in server order
  fn get_todos(&self) -> impl Future<Output = Result<Vec<Todo>>> + Send;

  /// Set `done` on a todo, returning the updated records
  fn toggle_todo(&self, id: &TodoId, done: bool) -> impl Future<Output = Result<Vec<Todo>>> + Send;

  /// Insert a todo, returning the inserted records
  fn add_todo(&self, text: &str) -> impl Future<Output = Result<Vec<Todo>>> + Send;

  /// Delete a todo, returning the deleted ids
  fn delete_todo(&self, id: &TodoId) -> impl Future<Output = Result<Vec<TodoId>>> + Send;
}

/// GraphQL-over-HTTP client
#[derive(Clone)]
pub struct GraphqlClient {
  http: reqwest::Client,
  endpoint: Url,
}

impl GraphqlClient {
  pub fn new(config: &Config) -> Result<Self> {
    let endpoint = config.endpoint_url()?;

    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
      let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| eyre!("Invalid header name {}: {}", name, e))?;
      let value = HeaderValue::from_str(value)
        .map_err(|e| eyre!("Invalid value for header {}: {}", name, e))?;
      headers.insert(name, value);
    }

    if let Some(secret) = Config::get_admin_secret() {
      let value = HeaderValue::from_str(&secret)
        .map_err(|e| eyre!("Invalid admin secret: {}", e))?;
      headers.insert(HeaderName::from_static("x-hasura-admin-secret"), value);
    }

    if let Some(token) = Config::get_bearer_token() {
      let value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| eyre!("Invalid bearer token: {}", e))?;
      headers.insert(AUTHORIZATION, value);
    }

    let http = reqwest::Client::builder()
      .default_headers(headers)
      .timeout(Duration::from_secs(config.request_timeout_secs))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, endpoint })
  }

  pub fn endpoint(&self) -> &Url {
    &self.endpoint
  }

  /// Send one operation and decode its `data`
  pub async fn execute<O: Operation>(&self, variables: O::Variables) -> Result<O::Data> {
    let request = GraphqlRequest {
      query: O::DOCUMENT,
      operation_name: O::NAME,
      variables,
    };

    debug!(operation = O::NAME, endpoint = %self.endpoint, "sending GraphQL request");

    let response = self
      .http
      .post(self.endpoint.clone())
      .json(&request)
      .send()
      .await
      .map_err(|e| eyre!("Failed to send {}: {}", O::NAME, e))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| eyre!("Failed to read {} response: {}", O::NAME, e))?;

    if !status.is_success() {
      return Err(eyre!("{} failed with HTTP {}: {}", O::NAME, status, body));
    }

    let parsed: GraphqlResponse<O::Data> = serde_json::from_str(&body)
      .map_err(|e| eyre!("Failed to parse {} response: {}", O::NAME, e))?;

    parsed.into_data(O::NAME)
  }
}

impl TodoApi for GraphqlClient {
  async fn get_todos(&self) -> Result<Vec<Todo>> {
    let data = self.execute::<GetTodos>(NoVariables {}).await?;
    Ok(data.todos)
  }

  async fn toggle_todo(&self, id: &TodoId, done: bool) -> Result<Vec<Todo>> {
    let data = self
      .execute::<ToggleTodo>(ToggleTodoVariables {
        id: id.clone(),
        done,
      })
      .await?;
    Ok(data.update_todos.map(|r| r.returning).unwrap_or_default())
  }

  async fn add_todo(&self, text: &str) -> Result<Vec<Todo>> {
    let data = self
      .execute::<AddTodo>(AddTodoVariables {
        text: text.to_string(),
      })
      .await?;
    Ok(data.insert_todos.map(|r| r.returning).unwrap_or_default())
  }

  async fn delete_todo(&self, id: &TodoId) -> Result<Vec<TodoId>> {
    let data = self
      .execute::<DeleteTodo>(DeleteTodoVariables { id: id.clone() })
      .await?;
    Ok(
      data
        .delete_todos
        .map(|r| r.returning.into_iter().map(|t| t.id).collect())
        .unwrap_or_default(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::StatusCode;
  use axum::routing::post;
  use axum::{Json, Router};
  use serde_json::{json, Value};
  use std::sync::{Arc, Mutex};

  type Seen = Arc<Mutex<Vec<(HeaderMap, Value)>>>;

  /// Serve a fixed response on /v1/graphql, recording each request.
  async fn serve(status: StatusCode, response: Value) -> (Url, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let app = Router::new().route(
      "/v1/graphql",
      post(move |headers: HeaderMap, Json(body): Json<Value>| {
        let recorder = recorder.clone();
        let response = response.clone();
        async move {
          recorder.lock().unwrap().push((headers, body));
          (status, Json(response))
        }
      }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });

    let url = Url::parse(&format!("http://{}/v1/graphql", addr)).unwrap();
    (url, seen)
  }

  fn client_for(url: &Url) -> GraphqlClient {
    let mut config = Config::with_endpoint(url.as_str());
    config
      .headers
      .insert("x-hasura-role".to_string(), "user".to_string());
    GraphqlClient::new(&config).unwrap()
  }

  #[tokio::test]
  async fn test_get_todos() {
    let (url, seen) = serve(
      StatusCode::OK,
      json!({ "data": { "todos": [
        { "id": "1", "text": "A", "done": false },
        { "id": "2", "text": "B", "done": true }
      ] } }),
    )
    .await;

    let todos = client_for(&url).get_todos().await.unwrap();
    assert_eq!(
      todos,
      vec![Todo::new("1", "A", false), Todo::new("2", "B", true)]
    );

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (headers, body) = &seen[0];
    assert_eq!(body["operationName"], "getTodos");
    assert_eq!(headers.get("x-hasura-role").unwrap(), "user");
  }

  #[tokio::test]
  async fn test_toggle_sends_variables() {
    let (url, seen) = serve(
      StatusCode::OK,
      json!({ "data": { "update_todos": { "returning": [
        { "id": "1", "text": "A", "done": true }
      ] } } }),
    )
    .await;

    let updated = client_for(&url)
      .toggle_todo(&TodoId::new("1"), true)
      .await
      .unwrap();
    assert_eq!(updated, vec![Todo::new("1", "A", true)]);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].1["operationName"], "toggletodo");
    assert_eq!(seen[0].1["variables"], json!({ "id": "1", "done": true }));
  }

  #[tokio::test]
  async fn test_add_sends_raw_text() {
    let (url, seen) = serve(
      StatusCode::OK,
      json!({ "data": { "insert_todos": { "returning": [
        { "id": "9", "text": "  milk ", "done": false }
      ] } } }),
    )
    .await;

    let inserted = client_for(&url).add_todo("  milk ").await.unwrap();
    assert_eq!(inserted[0].id, TodoId::new("9"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].1["variables"], json!({ "text": "  milk " }));
  }

  #[tokio::test]
  async fn test_delete_returns_ids() {
    let (url, _seen) = serve(
      StatusCode::OK,
      json!({ "data": { "delete_todos": { "returning": [ { "id": "1", "text": "A" } ] } } }),
    )
    .await;

    let deleted = client_for(&url)
      .delete_todo(&TodoId::new("1"))
      .await
      .unwrap();
    assert_eq!(deleted, vec![TodoId::new("1")]);
  }

  #[tokio::test]
  async fn test_graphql_errors_fail() {
    let (url, _seen) = serve(
      StatusCode::OK,
      json!({ "errors": [ { "message": "permission denied" } ] }),
    )
    .await;

    let err = client_for(&url).get_todos().await.unwrap_err();
    assert!(err.to_string().contains("permission denied"));
  }

  #[tokio::test]
  async fn test_http_status_fails() {
    let (url, _seen) = serve(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;

    let err = client_for(&url).get_todos().await.unwrap_err();
    assert!(err.to_string().contains("500"));
  }
}
