use crate::RateLimiter;

use futures::StreamExt;
use futures::stream;

/// Outcome of one item in a parallel run, tagged with its input position.
#[derive(Debug)]
pub struct TaskResult<T, E> {
    pub index: usize,
    pub outcome: Result<T, E>,
}

impl<T, E> TaskResult<T, E> {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&E> {
        self.outcome.as_ref().err()
    }
}

/// Apply `f` to every item with at most `max_workers` in flight. Every item
/// runs regardless of earlier failures; results come back in input order.
pub async fn parallel_map<I, T, E, F, Fut>(
    items: Vec<I>,
    max_workers: usize,
    f: F,
) -> Vec<TaskResult<T, E>>
where
    F: Fn(I, usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    run_bounded(items, max_workers, None, f).await
}

/// [`parallel_map`] for side-effecting work.
pub async fn parallel_for_each<I, E, F, Fut>(
    items: Vec<I>,
    max_workers: usize,
    f: F,
) -> Vec<TaskResult<(), E>>
where
    F: Fn(I, usize) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    run_bounded(items, max_workers, None, f).await
}

pub(crate) async fn run_bounded<I, T, E, F, Fut>(
    items: Vec<I>,
    max_workers: usize,
    limiter: Option<&RateLimiter>,
    f: F,
) -> Vec<TaskResult<T, E>>
where
    F: Fn(I, usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let f = &f;
    let mut results: Vec<TaskResult<T, E>> = stream::iter(items.into_iter().enumerate())
        .map(|(index, item)| async move {
            if let Some(limiter) = limiter {
                limiter.wait().await;
            }
            TaskResult {
                index,
                outcome: f(item, index).await,
            }
        })
        .buffer_unordered(max_workers.max(1))
        .collect()
        .await;

    results.sort_by_key(|result| result.index);
    results
}
