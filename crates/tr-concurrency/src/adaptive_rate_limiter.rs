use crate::RateLimiter;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

// Adjustment policy:
// - keep the last 10 response times, act once at least 5 are recorded
// - average above 2s: slow down by 10%
// - average below 500ms: speed up by 5%, never past the target rate
const SAMPLE_WINDOW: usize = 10;
const MIN_SAMPLES: usize = 5;
const SLOW_RESPONSE: Duration = Duration::from_secs(2);
const FAST_RESPONSE: Duration = Duration::from_millis(500);
const DECREASE_FACTOR: f64 = 0.9;
const INCREASE_FACTOR: f64 = 1.05;
const MIN_REQUESTS_PER_MINUTE: f64 = 1.0;

#[derive(Debug)]
struct AdaptiveState {
    samples: VecDeque<Duration>,
    current_rpm: f64,
}

/// Wraps a [`RateLimiter`] and tunes its rate from observed response times.
#[derive(Debug)]
pub struct AdaptiveRateLimiter {
    limiter: Arc<RateLimiter>,
    target_rpm: f64,
    state: Mutex<AdaptiveState>,
}

impl AdaptiveRateLimiter {
    pub fn new(initial_rpm: u32, target_rpm: u32) -> Self {
        let limiter = Arc::new(RateLimiter::new(initial_rpm));
        Self::with_limiter(limiter, target_rpm)
    }

    /// Adapt an existing limiter, typically one shared with a worker pool.
    pub fn with_limiter(limiter: Arc<RateLimiter>, target_rpm: u32) -> Self {
        let current_rpm = limiter.requests_per_minute().unwrap_or(f64::from(target_rpm));
        let target_rpm = if target_rpm == 0 {
            current_rpm
        } else {
            f64::from(target_rpm)
        };

        Self {
            limiter,
            target_rpm,
            state: Mutex::new(AdaptiveState {
                samples: VecDeque::with_capacity(SAMPLE_WINDOW),
                current_rpm,
            }),
        }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn current_rpm(&self) -> f64 {
        self.lock().current_rpm
    }

    pub fn target_rpm(&self) -> f64 {
        self.target_rpm
    }

    pub async fn wait(&self) {
        self.limiter.wait().await;
    }

    /// Feed one observed response time into the window and retune.
    pub fn record_response_time(&self, elapsed: Duration) {
        let adjusted = {
            let mut state = self.lock();
            state.samples.push_back(elapsed);
            if state.samples.len() > SAMPLE_WINDOW {
                state.samples.pop_front();
            }
            if state.samples.len() < MIN_SAMPLES {
                return;
            }

            let total: Duration = state.samples.iter().sum();
            let average = total / state.samples.len() as u32;

            let next = if average > SLOW_RESPONSE {
                (state.current_rpm * DECREASE_FACTOR).max(MIN_REQUESTS_PER_MINUTE)
            } else if average < FAST_RESPONSE {
                (state.current_rpm * INCREASE_FACTOR).min(self.target_rpm)
            } else {
                return;
            };

            if (next - state.current_rpm).abs() < f64::EPSILON {
                return;
            }
            state.current_rpm = next;
            (next, average)
        };

        let (rpm, average) = adjusted;
        log::debug!("Adaptive rate limit now {rpm:.1} req/min (avg response {average:?})");
        self.limiter.set_requests_per_minute(rpm);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AdaptiveState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
