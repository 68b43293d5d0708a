//! Background re-runnable read.
//!
//! A `Query<T>` owns a fetcher closure. Each run is spawned on tokio and
//! tagged with a generation number; `poll()` hands over the result of the
//! newest run exactly once and drops results from superseded runs. The query
//! keeps no copy of the value, callers move it into their own store.

use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;

/// Where the latest run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
  /// Never started
  Idle,
  /// A run is in flight
  Loading,
  /// The latest run succeeded
  Done,
  /// The latest run failed
  Failed,
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;

type FetcherFn<T> = Box<dyn Fn() -> BoxFuture<T> + Send + Sync>;

pub struct Query<T> {
  status: QueryStatus,
  fetcher: FetcherFn<T>,
  tx: mpsc::UnboundedSender<(u32, Result<T, String>)>,
  rx: mpsc::UnboundedReceiver<(u32, Result<T, String>)>,
  generation: u32,
}

impl<T: Send + 'static> Query<T> {
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      status: QueryStatus::Idle,
      fetcher: Box::new(move || Box::pin(fetcher())),
      tx,
      rx,
      generation: 0,
    }
  }

  pub fn is_loading(&self) -> bool {
    self.status == QueryStatus::Loading
  }

  pub fn is_failed(&self) -> bool {
    self.status == QueryStatus::Failed
  }

  /// Number of runs started so far
  pub fn runs(&self) -> u32 {
    self.generation
  }

  /// Start a run unless one is already in flight.
  pub fn fetch(&mut self) {
    if !self.is_loading() {
      self.spawn_run();
    }
  }

  /// Start a run now. Results of earlier runs still in flight are ignored.
  pub fn refetch(&mut self) {
    self.spawn_run();
  }

  /// Take the result of the newest run, if it has arrived.
  pub fn poll(&mut self) -> Option<Result<T, String>> {
    let mut latest = None;
    while let Ok((generation, result)) = self.rx.try_recv() {
      if generation == self.generation {
        latest = Some(result);
      }
    }

    let result = latest?;
    self.status = if result.is_ok() {
      QueryStatus::Done
    } else {
      QueryStatus::Failed
    };
    Some(result)
  }

  fn spawn_run(&mut self) {
    self.generation += 1;
    self.status = QueryStatus::Loading;

    let generation = self.generation;
    let tx = self.tx.clone();
    let future = (self.fetcher)();
    tokio::spawn(async move {
      let _ = tx.send((generation, future.await));
    });
  }
}

impl<T> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("status", &self.status)
      .field("generation", &self.generation)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::sync::Arc;
  use std::time::Duration;

  #[tokio::test]
  async fn test_result_is_handed_over_once() {
    let mut query = Query::new(|| async { Ok::<_, String>(vec!["milk", "eggs"]) });
    assert!(!query.is_loading());
    assert!(query.poll().is_none());

    query.fetch();
    assert!(query.is_loading());
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(query.poll(), Some(Ok(vec!["milk", "eggs"])));
    assert!(!query.is_loading() && !query.is_failed());
    assert!(query.poll().is_none());
  }

  #[tokio::test]
  async fn test_failure_marks_failed() {
    let mut query: Query<()> = Query::new(|| async { Err("connection refused".to_string()) });

    query.fetch();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(query.poll(), Some(Err("connection refused".to_string())));
    assert!(query.is_failed());
  }

  #[tokio::test]
  async fn test_newest_run_wins_over_slow_older_run() {
    let counter = Arc::new(AtomicU32::new(0));
    let runs = counter.clone();

    // first run is slow, second is fast
    let mut query = Query::new(move || {
      let n = runs.fetch_add(1, Ordering::SeqCst);
      async move {
        let delay = if n == 0 { 60 } else { 5 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok::<_, String>(n)
      }
    });

    query.fetch();
    query.fetch();
    assert_eq!(query.runs(), 1);

    query.refetch();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(query.poll(), Some(Ok(1)));

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(query.poll().is_none());
    assert_eq!(query.runs(), 2);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
  }
}
