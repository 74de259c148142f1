use crate::{ConcurrencyError, Result as ConcurrencyResult};

use std::fmt::Display;
use std::time::Duration;

use tokio::time::sleep;

// 10 items per batch, 3 retries 1 second apart, 100ms pause between batches.
const DEFAULT_BATCH_SIZE: usize = 10;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
const DEFAULT_INTER_BATCH_DELAY_MS: u64 = 100;

/// Feeds a slice to a handler in fixed-size chunks, retrying a failed chunk
/// and pausing between chunks.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    batch_size: usize,
    max_retries: u32,
    retry_delay: Duration,
    inter_batch_delay: Duration,
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            inter_batch_delay: Duration::from_millis(DEFAULT_INTER_BATCH_DELAY_MS),
        }
    }
}

impl BatchProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_inter_batch_delay(mut self, delay: Duration) -> Self {
        self.inter_batch_delay = delay;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Run `handler(batch, start_index)` over every chunk of `items`.
    ///
    /// A chunk is attempted up to `max_retries + 1` times. When it never
    /// succeeds the run stops and the error names the chunk's index range.
    /// Returns the number of items processed.
    pub async fn process<'a, T, F, Fut, E>(
        &self,
        items: &'a [T],
        handler: F,
    ) -> ConcurrencyResult<usize>
    where
        F: Fn(&'a [T], usize) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        let batch_count = items.len().div_ceil(self.batch_size);

        for (batch_index, batch) in items.chunks(self.batch_size).enumerate() {
            let start = batch_index * self.batch_size;
            let end = start + batch.len();
            let mut attempts = 0;

            loop {
                attempts += 1;
                match handler(batch, start).await {
                    Ok(()) => break,
                    Err(e) if attempts <= self.max_retries => {
                        log::debug!(
                            "Batch [{start}..{end}) attempt {attempts} failed: {e}. Retrying in {:?}",
                            self.retry_delay
                        );
                        sleep(self.retry_delay).await;
                    }
                    Err(e) => {
                        log::warn!("Batch [{start}..{end}) failed after {attempts} attempts: {e}");
                        return Err(ConcurrencyError::batch_failed(
                            start,
                            end,
                            attempts,
                            e.to_string(),
                        ));
                    }
                }
            }

            if batch_index + 1 < batch_count && !self.inter_batch_delay.is_zero() {
                sleep(self.inter_batch_delay).await;
            }
        }

        Ok(items.len())
    }
}
