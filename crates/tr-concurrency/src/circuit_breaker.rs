use std::panic::Location;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use error_location::ErrorLocation;
use thiserror::Error;
use tokio::time::Instant;

// Open after 5 consecutive failures, probe again after 30 seconds.
const DEFAULT_MAX_FAILURES: u32 = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation - requests flow through
    Closed,
    /// Too many failures - requests rejected immediately
    Open,
    /// Timeout elapsed - a single trial request is allowed
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half-open",
        }
    }
}

#[derive(Error, Debug)]
pub enum CircuitBreakerError<E> {
    #[error("circuit breaker is open {location}")]
    Open { location: ErrorLocation },

    #[error("{0}")]
    Inner(E),
}

impl<E> CircuitBreakerError<E> {
    pub fn is_open(&self) -> bool {
        matches!(self, CircuitBreakerError::Open { .. })
    }

    pub fn into_inner(self) -> Option<E> {
        match self {
            CircuitBreakerError::Inner(e) => Some(e),
            CircuitBreakerError::Open { .. } => None,
        }
    }
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failures: u32,
    last_failure: Option<Instant>,
    trial_in_flight: bool,
    /// Bumped on every state change. Outcomes of calls admitted under an
    /// earlier generation are not counted.
    generation: u64,
}

impl BreakerState {
    fn transition(&mut self, state: CircuitState) {
        self.state = state;
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Thread-safe circuit breaker
#[derive(Debug)]
pub struct CircuitBreaker {
    max_failures: u32,
    timeout: Duration,
    inner: Mutex<BreakerState>,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_FAILURES,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }
}

impl CircuitBreaker {
    pub fn new(max_failures: u32, timeout: Duration) -> Self {
        Self {
            max_failures: max_failures.max(1),
            timeout,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                failures: 0,
                last_failure: None,
                trial_in_flight: false,
                generation: 0,
            }),
        }
    }

    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn failures(&self) -> u32 {
        self.lock().failures
    }

    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.transition(CircuitState::Closed);
        inner.failures = 0;
        inner.last_failure = None;
        inner.trial_in_flight = false;
    }

    /// Run `operation` through the breaker. The lock is never held across
    /// the await.
    #[track_caller]
    pub fn execute<'a, F, Fut, T, E>(
        &'a self,
        operation: F,
    ) -> impl Future<Output = Result<T, CircuitBreakerError<E>>> + 'a
    where
        F: FnOnce() -> Fut + 'a,
        Fut: Future<Output = Result<T, E>> + 'a,
        T: 'a,
        E: 'a,
    {
        let location = ErrorLocation::from(Location::caller());
        async move {
            let mut permit = self.acquire(location)?;
            let result = operation().await;
            match &result {
                Ok(_) => self.record_success(&permit),
                Err(_) => self.record_failure(&permit),
            }
            permit.settled = true;
            result.map_err(CircuitBreakerError::Inner)
        }
    }

    fn acquire<E>(&self, location: ErrorLocation) -> Result<Permit<'_>, CircuitBreakerError<E>> {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => Ok(Permit::new(self, false, inner.generation)),
            CircuitState::Open => {
                let elapsed = inner
                    .last_failure
                    .map(|at| at.elapsed())
                    .unwrap_or(Duration::MAX);
                if elapsed >= self.timeout {
                    inner.transition(CircuitState::HalfOpen);
                    inner.trial_in_flight = true;
                    log::info!("Circuit breaker transitioning to HalfOpen");
                    Ok(Permit::new(self, true, inner.generation))
                } else {
                    Err(CircuitBreakerError::Open { location })
                }
            }
            CircuitState::HalfOpen => {
                if inner.trial_in_flight {
                    Err(CircuitBreakerError::Open { location })
                } else {
                    inner.trial_in_flight = true;
                    Ok(Permit::new(self, true, inner.generation))
                }
            }
        }
    }

    fn record_success(&self, permit: &Permit<'_>) {
        let mut inner = self.lock();
        if inner.generation != permit.generation {
            log::debug!("Ignoring success of a call admitted before the last state change");
            return;
        }
        inner.failures = 0;
        if permit.trial {
            inner.trial_in_flight = false;
        }
        if inner.state == CircuitState::HalfOpen {
            inner.transition(CircuitState::Closed);
            log::info!("Circuit breaker closed after successful trial");
        }
    }

    fn record_failure(&self, permit: &Permit<'_>) {
        let mut inner = self.lock();
        if inner.generation != permit.generation {
            log::debug!("Ignoring failure of a call admitted before the last state change");
            return;
        }
        inner.failures = inner.failures.saturating_add(1);
        inner.last_failure = Some(Instant::now());
        if permit.trial {
            inner.trial_in_flight = false;
        }

        match inner.state {
            CircuitState::Closed if inner.failures >= self.max_failures => {
                inner.transition(CircuitState::Open);
                log::warn!(
                    "Circuit breaker opened after {} consecutive failures",
                    inner.failures
                );
            }
            CircuitState::HalfOpen => {
                inner.transition(CircuitState::Open);
                log::warn!("Circuit breaker trial failed, reopening");
            }
            _ => {}
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases a half-open trial slot if the guarded future is dropped before
/// it reports an outcome.
struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    generation: u64,
    settled: bool,
}

impl<'a> Permit<'a> {
    fn new(breaker: &'a CircuitBreaker, trial: bool, generation: u64) -> Self {
        Self {
            breaker,
            trial,
            generation,
            settled: false,
        }
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if self.trial && !self.settled {
            let mut inner = self.breaker.lock();
            if inner.generation == self.generation {
                inner.trial_in_flight = false;
            }
        }
    }
}

/// Run `operation` through `breaker` when one is configured, directly
/// otherwise.
pub async fn execute_guarded<F, Fut, T, E>(
    breaker: Option<&CircuitBreaker>,
    operation: F,
) -> Result<T, CircuitBreakerError<E>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match breaker {
        Some(breaker) => breaker.execute(operation).await,
        None => operation().await.map_err(CircuitBreakerError::Inner),
    }
}
