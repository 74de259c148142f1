use crate::{ConcurrencyError, Result as ConcurrencyResult};

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::{Instant, sleep_until};

// Defaults sized for hosted test-management APIs:
// - 180 requests per minute when nothing is configured
// - burst of 15% of the per-minute rate, never fewer than 10 tokens
const DEFAULT_REQUESTS_PER_MINUTE: u32 = 180;
const MIN_BURST: u32 = 10;
const BURST_FRACTION: f64 = 0.15;

/// Token-bucket state. `tokens` may go negative while reservations are
/// outstanding; the deficit is paid back by the refill.
#[derive(Debug)]
struct Bucket {
    per_second: f64,
    burst: f64,
    tokens: f64,
    last: Instant,
}

impl Bucket {
    fn advance(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.per_second).min(self.burst);
        self.last = now;
    }

    fn delay_for_deficit(&self) -> Duration {
        if self.tokens >= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(-self.tokens / self.per_second)
        }
    }
}

/// Token-bucket throttle for outbound requests.
///
/// [`RateLimiter::unlimited`] is the null object: every method returns
/// immediately as if a token were always available. Code that may or may not
/// be throttled holds a `RateLimiter` either way instead of branching.
#[derive(Debug)]
pub struct RateLimiter {
    bucket: Option<Mutex<Bucket>>,
}

impl RateLimiter {
    /// `requests_per_minute == 0` falls back to 180/min.
    pub fn new(requests_per_minute: u32) -> Self {
        let rpm = if requests_per_minute == 0 {
            DEFAULT_REQUESTS_PER_MINUTE
        } else {
            requests_per_minute
        };
        let burst = burst_for(rpm);

        Self {
            bucket: Some(Mutex::new(Bucket {
                per_second: f64::from(rpm) / 60.0,
                burst: f64::from(burst),
                tokens: f64::from(burst),
                last: Instant::now(),
            })),
        }
    }

    pub fn unlimited() -> Self {
        Self { bucket: None }
    }

    pub fn is_unlimited(&self) -> bool {
        self.bucket.is_none()
    }

    /// Current rate in requests per minute (`None` when unlimited).
    pub fn requests_per_minute(&self) -> Option<f64> {
        self.with_bucket(|bucket| bucket.per_second * 60.0)
    }

    pub fn burst(&self) -> Option<u32> {
        self.with_bucket(|bucket| bucket.burst as u32)
    }

    /// Change the refill rate in place. Tokens accrued so far are kept.
    pub fn set_requests_per_minute(&self, requests_per_minute: f64) {
        if requests_per_minute <= 0.0 {
            return;
        }

        self.with_bucket(|bucket| {
            bucket.advance(Instant::now());
            bucket.per_second = requests_per_minute / 60.0;
        });
    }

    /// Take a token if one is available right now.
    pub fn allow(&self) -> bool {
        self.with_bucket(|bucket| {
            bucket.advance(Instant::now());
            if bucket.tokens >= 1.0 {
                bucket.tokens -= 1.0;
                true
            } else {
                false
            }
        })
        .unwrap_or(true)
    }

    /// Claim the next token, possibly in the future. The returned reservation
    /// reports how long the caller has to wait; it can be waited on or
    /// cancelled to hand the token back.
    pub fn reserve(&self) -> Reservation<'_> {
        let now = Instant::now();
        let delay = self
            .with_bucket(|bucket| {
                bucket.advance(now);
                bucket.tokens -= 1.0;
                bucket.delay_for_deficit()
            })
            .unwrap_or(Duration::ZERO);

        Reservation {
            limiter: self,
            ready_at: now + delay,
            delay,
        }
    }

    /// Block until a token is available.
    pub async fn wait(&self) {
        if self.is_unlimited() {
            return;
        }
        self.reserve().wait().await;
    }

    /// Block for at most `timeout`. Returns `false` (and consumes nothing)
    /// when no token would become available in time.
    pub async fn wait_timeout(&self, timeout: Duration) -> bool {
        let reservation = self.reserve();
        if reservation.delay() > timeout {
            reservation.cancel();
            return false;
        }
        reservation.wait().await;
        true
    }

    /// Like [`RateLimiter::wait_timeout`] but reported as an error.
    pub async fn acquire_within(&self, timeout: Duration) -> ConcurrencyResult<()> {
        if self.wait_timeout(timeout).await {
            Ok(())
        } else {
            Err(ConcurrencyError::rate_limit_timeout(timeout))
        }
    }

    fn with_bucket<R>(&self, f: impl FnOnce(&mut Bucket) -> R) -> Option<R> {
        self.bucket.as_ref().map(|bucket| {
            let mut guard = bucket.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        })
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_REQUESTS_PER_MINUTE)
    }
}

/// A token claimed from a [`RateLimiter`], usable at `ready_at`.
#[derive(Debug)]
#[must_use = "a reservation holds a token until it is waited on or cancelled"]
pub struct Reservation<'a> {
    limiter: &'a RateLimiter,
    ready_at: Instant,
    delay: Duration,
}

impl Reservation<'_> {
    /// How long the caller must wait before acting.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn wait(self) {
        if !self.delay.is_zero() {
            sleep_until(self.ready_at).await;
        }
    }

    /// Give the token back. A reservation whose time has already passed is
    /// considered used and nothing is returned.
    pub fn cancel(self) {
        let now = Instant::now();
        if self.ready_at < now {
            return;
        }
        self.limiter.with_bucket(|bucket| {
            bucket.advance(now);
            bucket.tokens = (bucket.tokens + 1.0).min(bucket.burst);
        });
    }
}

fn burst_for(requests_per_minute: u32) -> u32 {
    let fraction = (f64::from(requests_per_minute) * BURST_FRACTION) as u32;
    fraction.max(MIN_BURST)
}
