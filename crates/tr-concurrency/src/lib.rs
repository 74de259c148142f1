//! Concurrency substrate for talking to a rate-limited remote API:
//! token-bucket throttling, bounded fan-out, retry with backoff and a
//! circuit breaker.

pub mod adaptive_rate_limiter;
pub mod batch_processor;
pub mod circuit_breaker;
pub mod error;
pub mod parallel;
pub mod rate_limiter;
pub mod retry;
pub mod worker_pool;

pub use adaptive_rate_limiter::AdaptiveRateLimiter;
pub use batch_processor::BatchProcessor;
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerError, CircuitState, execute_guarded};
pub use error::{ConcurrencyError, Result};
pub use parallel::{TaskResult, parallel_for_each, parallel_map};
pub use rate_limiter::{RateLimiter, Reservation};
pub use retry::{RetryConfig, RetryError, retry, retry_with_cancel};
pub use worker_pool::WorkerPool;

pub use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod tests;
