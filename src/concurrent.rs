use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Bounded concurrent executor for batch fetch-and-analyze jobs
pub struct ConcurrentScan {
    semaphore: Arc<Semaphore>,
    completed: Arc<AtomicUsize>,
    errors: Arc<AtomicUsize>,
}

impl ConcurrentScan {
    pub fn new(concurrency: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
            completed: Arc::new(AtomicUsize::new(0)),
            errors: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Run `task_fn` over every task with at most `concurrency` in flight.
    /// Results come back in completion order; a panicked task yields `None`.
    pub async fn execute<T, F, Fut>(&self, tasks: Vec<T>, task_fn: F) -> Vec<Option<Fut::Output>>
    where
        F: Fn(T) -> Fut + Clone + Send + 'static,
        Fut: std::future::Future + Send + 'static,
        Fut::Output: Send + 'static,
        T: Send + 'static,
    {
        let mut futures = FuturesUnordered::new();

        for task in tasks {
            let semaphore = self.semaphore.clone();
            let task_fn = task_fn.clone();
            let completed = self.completed.clone();

            futures.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok()?;
                let result = task_fn(task).await;
                completed.fetch_add(1, Ordering::Relaxed);
                Some(result)
            }));
        }

        let mut results = Vec::new();
        while let Some(result) = futures.next().await {
            match result {
                Ok(output) => results.push(output),
                Err(e) => {
                    tracing::error!(error = %e, "scan task panicked");
                    self.errors.fetch_add(1, Ordering::Relaxed);
                    results.push(None);
                }
            }
        }

        results
    }

    pub fn get_stats(&self) -> (usize, usize) {
        (
            self.completed.load(Ordering::Relaxed),
            self.errors.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn runs_every_task() {
        let pool = ConcurrentScan::new(2);
        let results = pool.execute(vec![1u32, 2, 3, 4], |n| async move { n * 10 }).await;
        let mut values: Vec<u32> = results.into_iter().flatten().collect();
        values.sort();
        assert_eq!(values, vec![10, 20, 30, 40]);
        assert_eq!(pool.get_stats(), (4, 0));
    }
}
