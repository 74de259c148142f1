use crate::RateLimiter;
use crate::parallel::{TaskResult, run_bounded};

use std::panic::resume_unwind;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

const DEFAULT_MAX_WORKERS: usize = 5;
const DEFAULT_REQUESTS_PER_MINUTE: u32 = 150;

/// Bounded set of workers sharing one rate limiter.
///
/// Submitted tasks take a worker slot, then a rate-limit token, then run.
/// [`WorkerPool::wait`] drains everything and reports the first error.
pub struct WorkerPool<E> {
    max_workers: usize,
    limiter: Arc<RateLimiter>,
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<Result<(), E>>,
}

impl<E: Send + 'static> Default for WorkerPool<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Send + 'static> WorkerPool<E> {
    pub fn new() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            limiter: Arc::new(RateLimiter::new(DEFAULT_REQUESTS_PER_MINUTE)),
            semaphore: Arc::new(Semaphore::new(DEFAULT_MAX_WORKERS)),
            tasks: JoinSet::new(),
        }
    }

    /// Values below 1 are raised to 1.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self.semaphore = Arc::new(Semaphore::new(self.max_workers));
        self
    }

    pub fn with_rate_limit(mut self, requests_per_minute: u32) -> Self {
        self.limiter = Arc::new(RateLimiter::new(requests_per_minute));
        self
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn submit<F, Fut>(&mut self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
    {
        let semaphore = Arc::clone(&self.semaphore);
        let limiter = Arc::clone(&self.limiter);

        self.tasks.spawn(async move {
            // The semaphore is owned by the pool and never closed.
            let _permit = semaphore.acquire_owned().await.ok();
            limiter.wait().await;
            task().await
        });
    }

    /// Wait for every submitted task. Returns the first error to occur; a
    /// panicking task is re-raised here.
    pub async fn wait(&mut self) -> Result<(), E> {
        let mut first_error = None;

        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
                Err(join_error) if join_error.is_panic() => {
                    resume_unwind(join_error.into_panic());
                }
                Err(join_error) => {
                    log::warn!("Worker task cancelled: {join_error}");
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// [`crate::parallel_map`] bounded by this pool's worker count and
    /// throttled by its rate limiter.
    pub async fn map<I, T, TE, F, Fut>(&self, items: Vec<I>, f: F) -> Vec<TaskResult<T, TE>>
    where
        F: Fn(I, usize) -> Fut,
        Fut: Future<Output = Result<T, TE>>,
    {
        run_bounded(items, self.max_workers, Some(&self.limiter), f).await
    }
}
