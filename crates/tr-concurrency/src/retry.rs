use std::fmt::Display;
use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use thiserror::Error;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

// Retry defaults for a throttled remote API:
// - 5 retries after the first attempt
// - start at 1 second, double each time, cap at 30 seconds
const DEFAULT_MAX_RETRIES: u32 = 5;
const DEFAULT_INITIAL_DELAY_SECS: u64 = 1;
const DEFAULT_MAX_DELAY_SECS: u64 = 30;
const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Error texts that may be retried. Empty means every error is retryable.
    pub retryable_errors: Vec<String>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_secs(DEFAULT_INITIAL_DELAY_SECS),
            max_delay: Duration::from_secs(DEFAULT_MAX_DELAY_SECS),
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            retryable_errors: Vec::new(),
        }
    }
}

impl RetryConfig {
    /// Exact match on the rendered error text.
    pub fn is_retryable<E: Display>(&self, error: &E) -> bool {
        if self.retryable_errors.is_empty() {
            return true;
        }
        let rendered = error.to_string();
        self.retryable_errors.iter().any(|text| *text == rendered)
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        Duration::from_secs_f64(
            (delay.as_secs_f64() * self.backoff_multiplier).min(self.max_delay.as_secs_f64()),
        )
    }
}

#[derive(Error, Debug)]
pub enum RetryError<E> {
    #[error("max retries exceeded after {attempts} attempts: {last_error} {location}")]
    Exhausted {
        attempts: u32,
        last_error: E,
        location: ErrorLocation,
    },

    #[error("non-retryable error: {error} {location}")]
    NonRetryable { error: E, location: ErrorLocation },

    #[error("context cancelled during retry after {attempts} attempts {location}")]
    Cancelled {
        attempts: u32,
        last_error: Option<E>,
        location: ErrorLocation,
    },
}

impl<E> RetryError<E> {
    /// The underlying operation error, if any attempt produced one.
    pub fn last_error(&self) -> Option<&E> {
        match self {
            RetryError::Exhausted { last_error, .. } => Some(last_error),
            RetryError::NonRetryable { error, .. } => Some(error),
            RetryError::Cancelled { last_error, .. } => last_error.as_ref(),
        }
    }

    pub fn into_last_error(self) -> Option<E> {
        match self {
            RetryError::Exhausted { last_error, .. } => Some(last_error),
            RetryError::NonRetryable { error, .. } => Some(error),
            RetryError::Cancelled { last_error, .. } => last_error,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled { .. })
    }
}

/// Execute an async operation with retry logic
#[track_caller]
pub fn retry<'a, F, Fut, T, E>(
    config: &'a RetryConfig,
    operation_name: &'a str,
    operation: F,
) -> impl Future<Output = Result<T, RetryError<E>>> + 'a
where
    F: FnMut() -> Fut + 'a,
    Fut: Future<Output = Result<T, E>> + 'a,
    E: Display + 'a,
    T: 'a,
{
    let location = ErrorLocation::from(Location::caller());
    run(None, config, operation_name, operation, location)
}

/// [`retry`] that gives up as soon as `token` is cancelled, including while
/// sleeping between attempts.
#[track_caller]
pub fn retry_with_cancel<'a, F, Fut, T, E>(
    token: &'a CancellationToken,
    config: &'a RetryConfig,
    operation_name: &'a str,
    operation: F,
) -> impl Future<Output = Result<T, RetryError<E>>> + 'a
where
    F: FnMut() -> Fut + 'a,
    Fut: Future<Output = Result<T, E>> + 'a,
    E: Display + 'a,
    T: 'a,
{
    let location = ErrorLocation::from(Location::caller());
    run(Some(token), config, operation_name, operation, location)
}

async fn run<F, Fut, T, E>(
    token: Option<&CancellationToken>,
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    location: ErrorLocation,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempts = 0;
    let mut delay = config.initial_delay;
    let mut last_error = None;

    loop {
        if token.is_some_and(CancellationToken::is_cancelled) {
            return Err(RetryError::Cancelled {
                attempts,
                last_error,
                location,
            });
        }

        attempts += 1;

        let error = match operation().await {
            Ok(result) => {
                if attempts > 1 {
                    log::info!("{operation_name} succeeded after {attempts} attempts");
                }
                return Ok(result);
            }
            Err(e) => e,
        };

        if !config.is_retryable(&error) {
            log::warn!("{operation_name} failed with non-retryable error: {error}");
            return Err(RetryError::NonRetryable { error, location });
        }

        if attempts > config.max_retries {
            log::warn!("{operation_name} failed after {attempts} attempts: {error}");
            return Err(RetryError::Exhausted {
                attempts,
                last_error: error,
                location,
            });
        }

        log::debug!(
            "{operation_name} attempt {attempts} failed: {error}. Retrying in {delay:?}"
        );
        last_error = Some(error);

        match token {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => {
                        return Err(RetryError::Cancelled {
                            attempts,
                            last_error,
                            location,
                        });
                    }
                    _ = sleep(delay) => {}
                }
            }
            None => sleep(delay).await,
        }

        delay = config.next_delay(delay);
    }
}
