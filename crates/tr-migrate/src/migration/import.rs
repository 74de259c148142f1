use crate::{ImportOutcome, MappingStatus, Migration, MigrationError, MigrationResult};

use tr_concurrency::{CircuitBreakerError, RetryError, WorkerPool, execute_guarded, retry};
use tr_core::{ClientError, ClientResult, Entity, EntityKind};

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Why one item could not be created.
#[derive(Debug)]
pub(crate) struct ItemFailure {
    pub(crate) message: String,
    /// The remote system could not be reached at all.
    pub(crate) unavailable: bool,
}

impl ItemFailure {
    /// Refused locally, before any remote call.
    pub(crate) fn rejected<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            unavailable: false,
        }
    }

    fn from_client(error: ClientError) -> Self {
        Self {
            unavailable: error.is_unavailable(),
            message: error.to_string(),
        }
    }

    fn from_retry(error: RetryError<ClientError>) -> Self {
        Self {
            unavailable: error.is_cancelled()
                || error.last_error().is_some_and(ClientError::is_unavailable),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Migration {
    /// One remote create call, wrapped as `circuit_breaker(retry(call))` so an
    /// open circuit rejects immediately without spending retry attempts.
    pub(crate) async fn call_guarded<T, F, Fut>(
        &self,
        kind: EntityKind,
        operation_name: &str,
        operation: F,
    ) -> Result<T, ItemFailure>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let started = Instant::now();
        let operation = &operation;
        let retry_config = self.retry.as_ref();

        let outcome = execute_guarded(self.breaker.as_deref(), move || async move {
            match retry_config {
                Some(config) => retry(config, operation_name, operation)
                    .await
                    .map_err(ItemFailure::from_retry),
                None => operation().await.map_err(ItemFailure::from_client),
            }
        })
        .await;

        let elapsed = started.elapsed();
        self.metrics.create_latency(kind, elapsed);
        if let Some(adaptive) = &self.adaptive {
            adaptive.record_response_time(elapsed);
        }

        match outcome {
            Ok(value) => Ok(value),
            Err(CircuitBreakerError::Inner(failure)) => Err(failure),
            Err(open) => Err(ItemFailure {
                message: open.to_string(),
                unavailable: true,
            }),
        }
    }

    /// Create every item through the worker pool, batch by batch.
    ///
    /// A failing item is logged and listed in the outcome; the rest carry on.
    /// Until some item has reached the remote system, a batch in which every
    /// item failed as unreachable is retried by the batch processor and
    /// aborts the import once its retries run out. After that, unreachable
    /// items are ordinary per-item failures.
    pub(crate) async fn import_items<E, F, Fut>(
        &self,
        items: &[E],
        dry_run: bool,
        create: F,
    ) -> MigrationResult<ImportOutcome>
    where
        E: Entity,
        F: Fn(&E) -> Fut,
        Fut: Future<Output = Result<i64, ItemFailure>>,
    {
        let kind = E::KIND;
        if dry_run {
            log::info!("Dry run: {} {kind} would be imported", items.len());
            return Ok(ImportOutcome::default());
        }
        if items.is_empty() {
            return Ok(ImportOutcome::default());
        }

        log::info!(
            "Importing {} {kind} with {} workers",
            items.len(),
            self.workers
        );

        let pool: WorkerPool<MigrationError> = WorkerPool::new()
            .with_max_workers(self.workers)
            .with_rate_limiter(Arc::clone(&self.limiter));
        let outcome = Mutex::new(ImportOutcome::default());
        let reached = AtomicBool::new(false);
        let (pool, create, outcome_ref, reached) = (&pool, &create, &outcome, &reached);

        self.batch
            .process(items, move |batch, _start| async move {
                let results = pool
                    .map(batch.iter().collect::<Vec<&E>>(), move |item, _| async move {
                        let created = create(item).await;
                        if let Ok(target_id) = created {
                            self.lock_mapping(kind)
                                .add_pair(item.id(), target_id, MappingStatus::Created);
                            lock(outcome_ref).imported += 1;
                            self.metrics.item_imported(kind);
                            log::debug!(
                                "Created {kind} '{}' ({} -> {target_id})",
                                item.label(),
                                item.id()
                            );
                        }
                        created
                    })
                    .await;

                let failures: Vec<(usize, ItemFailure)> = results
                    .into_iter()
                    .filter_map(|result| result.outcome.err().map(|f| (result.index, f)))
                    .collect();

                let batch_unreachable =
                    failures.len() == batch.len() && failures.iter().all(|(_, f)| f.unavailable);
                if !batch_unreachable {
                    reached.store(true, Ordering::SeqCst);
                } else if !reached.load(Ordering::SeqCst) {
                    let cause = failures
                        .first()
                        .map(|(_, f)| f.message.as_str())
                        .unwrap_or_default();
                    return Err(format!(
                        "client unavailable for all {} items: {cause}",
                        batch.len()
                    ));
                }

                let mut outcome = lock(outcome_ref);
                for (index, failure) in failures {
                    let item = &batch[index];
                    log::warn!(
                        "Failed to import {kind} '{}' (source {}): {}",
                        item.label(),
                        item.id(),
                        failure.message
                    );
                    self.metrics.item_failed(kind);
                    outcome
                        .errors
                        .push(format!("{}: {}", item.label(), failure.message));
                }
                Ok(())
            })
            .await
            .map_err(|e| MigrationError::import(kind, e))?;

        Ok(outcome.into_inner().unwrap_or_else(PoisonError::into_inner))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
