//! State and operations behind the checklist screen.
//!
//! `TodoController` owns the list query, the cached list and the draft
//! input. Mutations run on spawned tasks and report back over a channel;
//! `poll()` applies their results to the cache on the UI loop:
//! - add: clear the draft, then re-fetch the list (or append locally)
//! - toggle: patch the returned records in place
//! - delete: drop the id from the cache, no re-fetch

use crate::config::InsertStrategy;
use crate::graphql::{Todo, TodoApi, TodoId, TodoStore};
use crate::query::Query;
use crate::ui::components::TextInput;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Question asked before a todo is deleted
pub const DELETE_PROMPT: &str = "Do you want to delete this todo?";

/// What the list area should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView<'a> {
  Loading,
  Error,
  Ready(&'a [Todo]),
}

/// Last operation outcome, shown in the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
  Info(String),
  Error(String),
}

#[derive(Debug)]
enum MutationOutcome {
  Added(Result<Vec<Todo>, String>),
  Toggled(TodoId, Result<Vec<Todo>, String>),
  Deleted(TodoId, Result<Vec<TodoId>, String>),
}

pub struct TodoController<A: TodoApi> {
  api: A,
  query: Query<Vec<Todo>>,
  store: TodoStore,
  draft: TextInput,
  insert_strategy: InsertStrategy,
  outcome_tx: mpsc::UnboundedSender<MutationOutcome>,
  outcome_rx: mpsc::UnboundedReceiver<MutationOutcome>,
  in_flight: usize,
  status: Option<StatusMessage>,
}

impl<A: TodoApi> TodoController<A> {
  /// Create the controller and start loading the list.
  pub fn new(api: A, insert_strategy: InsertStrategy) -> Self {
    let fetch_api = api.clone();
    let mut query = Query::new(move || {
      let api = fetch_api.clone();
      async move { api.get_todos().await.map_err(|e| e.to_string()) }
    });

    query.fetch();

    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

    Self {
      api,
      query,
      store: TodoStore::new(),
      draft: TextInput::new(),
      insert_strategy,
      outcome_tx,
      outcome_rx,
      in_flight: 0,
      status: None,
    }
  }

  pub fn list_view(&self) -> ListView<'_> {
    if self.query.is_failed() {
      ListView::Error
    } else if !self.store.is_loaded() {
      ListView::Loading
    } else {
      ListView::Ready(self.store.items())
    }
  }

  pub fn store(&self) -> &TodoStore {
    &self.store
  }

  pub fn draft(&self) -> &TextInput {
    &self.draft
  }

  pub fn draft_mut(&mut self) -> &mut TextInput {
    &mut self.draft
  }

  pub fn status(&self) -> Option<&StatusMessage> {
    self.status.as_ref()
  }

  /// Mutations dispatched but not yet applied
  pub fn in_flight(&self) -> usize {
    self.in_flight
  }

  /// Whether the list query is currently running
  pub fn is_fetching(&self) -> bool {
    self.query.is_loading()
  }

  /// Number of times the list has been requested from the server
  pub fn fetch_count(&self) -> u32 {
    self.query.runs()
  }

  /// Re-run the list query.
  pub fn refresh(&mut self) {
    debug!("refreshing todo list");
    self.query.refetch();
  }

  /// Insert the draft as a new todo.
  ///
  /// Whitespace-only drafts are ignored; otherwise the raw draft text is
  /// sent. Returns whether an insert was dispatched.
  pub fn submit(&mut self) -> bool {
    if self.draft.value().trim().is_empty() {
      return false;
    }

    let text = self.draft.value().to_string();
    debug!(text = %text, "adding todo");

    let api = self.api.clone();
    self.dispatch(async move {
      let result = api.add_todo(&text).await.map_err(|e| e.to_string());
      MutationOutcome::Added(result)
    });
    true
  }

  /// Flip `done` on a cached todo. Returns whether an update was dispatched.
  pub fn toggle(&mut self, id: &TodoId) -> bool {
    let Some(todo) = self.store.get(id) else {
      return false;
    };

    let done = !todo.done;
    debug!(id = %id, done, "toggling todo");

    let api = self.api.clone();
    let id = id.clone();
    self.dispatch(async move {
      let result = api.toggle_todo(&id, done).await.map_err(|e| e.to_string());
      MutationOutcome::Toggled(id, result)
    });
    true
  }

  /// Delete a cached todo if `confirm` agrees to `DELETE_PROMPT`.
  ///
  /// Returns whether a delete was dispatched.
  pub fn delete<C>(&mut self, id: &TodoId, confirm: C) -> bool
  where
    C: FnOnce(&str) -> bool,
  {
    if !self.store.contains(id) {
      return false;
    }

    if !confirm(DELETE_PROMPT) {
      debug!(id = %id, "delete declined");
      return false;
    }

    debug!(id = %id, "deleting todo");

    let api = self.api.clone();
    let id = id.clone();
    self.dispatch(async move {
      let result = api.delete_todo(&id).await.map_err(|e| e.to_string());
      MutationOutcome::Deleted(id, result)
    });
    true
  }

  /// Apply finished reads and mutations. Returns true if anything changed.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;

    match self.query.poll() {
      Some(Ok(todos)) => {
        info!(count = todos.len(), "todo list loaded");
        self.store.replace_all(todos);
        changed = true;
      }
      Some(Err(e)) => {
        error!(error = %e, "failed to fetch todos");
        changed = true;
      }
      None => {}
    }

    while let Ok(outcome) = self.outcome_rx.try_recv() {
      self.apply(outcome);
      changed = true;
    }

    changed
  }

  fn dispatch<F>(&mut self, operation: F)
  where
    F: Future<Output = MutationOutcome> + Send + 'static,
  {
    self.in_flight += 1;
    let tx = self.outcome_tx.clone();
    tokio::spawn(async move {
      let _ = tx.send(operation.await);
    });
  }

  fn apply(&mut self, outcome: MutationOutcome) {
    self.in_flight = self.in_flight.saturating_sub(1);

    match outcome {
      MutationOutcome::Added(Ok(inserted)) => {
        info!(count = inserted.len(), "todo added");
        self.draft.clear();
        match self.insert_strategy {
          InsertStrategy::Refetch => self.query.refetch(),
          InsertStrategy::Local => {
            for todo in inserted {
              self.store.upsert(todo);
            }
          }
        }
        self.status = Some(StatusMessage::Info("Todo added".to_string()));
      }
      MutationOutcome::Toggled(id, Ok(updated)) => {
        info!(id = %id, count = updated.len(), "todo toggled");
        let mut done = None;
        // only rows still cached are patched; a late response never re-adds one
        for todo in updated {
          let key = todo.id.clone();
          let now_done = todo.done;
          if self.store.patch_by_id(&key, |cached| *cached = todo) {
            done = Some(now_done);
          }
        }
        let message = match done {
          Some(true) => "Marked done",
          Some(false) => "Marked not done",
          None => "Todo no longer exists",
        };
        self.status = Some(StatusMessage::Info(message.to_string()));
      }
      MutationOutcome::Deleted(id, Ok(deleted)) => {
        info!(id = %id, count = deleted.len(), "todo deleted");
        self.store.remove_by_id(&id);
        self.status = Some(StatusMessage::Info("Todo deleted".to_string()));
      }
      MutationOutcome::Added(Err(e)) => self.fail("add todo", e),
      MutationOutcome::Toggled(_, Err(e)) => self.fail("update todo", e),
      MutationOutcome::Deleted(_, Err(e)) => self.fail("delete todo", e),
    }
  }

  fn fail(&mut self, action: &str, e: String) {
    error!(error = %e, "failed to {}", action);
    self.status = Some(StatusMessage::Error(format!("Failed to {}: {}", action, e)));
  }
}
