//! Bounded worker pool
//!
//! Work units are independent: each one gets its own input and returns its own
//! value. A dispatch spawns every unit at once, a semaphore caps how many run
//! at the same time, and the call returns only after every unit finished.

use crate::FinishTimesError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Fixed-size pool for fan-out maps
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Creates a pool running at most `size` units at once
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs an async unit per item and returns the results in input order
    ///
    /// If any unit fails, the error of the earliest failing item is returned
    /// once all units have finished.
    pub async fn map<T, R, F, Fut>(
        &self,
        items: impl IntoIterator<Item = T>,
        work: F,
    ) -> Result<Vec<R>, FinishTimesError>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R, FinishTimesError>> + Send + 'static,
        R: Send + 'static,
    {
        let handles: Vec<_> = items
            .into_iter()
            .map(|item| {
                let permits = self.permits.clone();
                let unit = work(item);
                tokio::spawn(async move {
                    // The semaphore is never closed, so acquiring cannot fail.
                    let _permit = permits.acquire_owned().await.ok();
                    unit.await
                })
            })
            .collect();

        join_in_order(handles).await
    }

    /// Runs a blocking unit per item on tokio's blocking threads
    ///
    /// Used for CPU-bound work such as HTML parsing. Ordering and error
    /// behaviour match [`WorkerPool::map`].
    pub async fn map_blocking<T, R, F>(
        &self,
        items: impl IntoIterator<Item = T>,
        work: F,
    ) -> Result<Vec<R>, FinishTimesError>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Result<R, FinishTimesError> + Send + Sync + 'static,
    {
        let work = Arc::new(work);
        let handles: Vec<_> = items
            .into_iter()
            .map(|item| {
                let permits = self.permits.clone();
                let work = work.clone();
                tokio::spawn(async move {
                    let _permit = permits.acquire_owned().await.ok();
                    tokio::task::spawn_blocking(move || (*work)(item)).await?
                })
            })
            .collect();

        join_in_order(handles).await
    }
}

/// Waits for every handle, keeping submission order
async fn join_in_order<R>(
    handles: Vec<JoinHandle<Result<R, FinishTimesError>>>,
) -> Result<Vec<R>, FinishTimesError> {
    let mut results = Vec::with_capacity(handles.len());
    let mut first_error = None;

    for handle in handles {
        match handle.await {
            Ok(Ok(value)) => results.push(value),
            Ok(Err(e)) => {
                first_error.get_or_insert(e);
            }
            Err(e) => {
                first_error.get_or_insert(FinishTimesError::Worker(e));
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(results),
    }
}
