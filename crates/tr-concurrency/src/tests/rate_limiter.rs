use crate::RateLimiter;

use std::time::Duration;

use tokio::time::{Instant, advance};
use tokio_test::{assert_pending, assert_ready, task};

#[tokio::test(start_paused = true)]
async fn given_unlimited_limiter_when_waiting_then_never_blocks() {
    let limiter = RateLimiter::unlimited();
    let start = Instant::now();

    for _ in 0..10_000 {
        limiter.wait().await;
        assert!(limiter.allow());
    }

    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(limiter.is_unlimited());
    assert_eq!(limiter.requests_per_minute(), None);
}

#[tokio::test(start_paused = true)]
async fn given_zero_rate_when_created_then_default_rate_applies() {
    let limiter = RateLimiter::new(0);

    assert_eq!(limiter.requests_per_minute(), Some(180.0));
    assert_eq!(limiter.burst(), Some(27));
}

#[tokio::test(start_paused = true)]
async fn given_low_rate_when_created_then_burst_has_floor() {
    let limiter = RateLimiter::new(30);
    assert_eq!(limiter.burst(), Some(10));
}

#[tokio::test(start_paused = true)]
async fn given_full_bucket_when_allowing_then_burst_passes_and_next_is_refused() {
    let limiter = RateLimiter::new(60);

    for _ in 0..10 {
        assert!(limiter.allow());
    }
    assert!(!limiter.allow());

    advance(Duration::from_secs(1)).await;
    assert!(limiter.allow());
    assert!(!limiter.allow());
}

#[tokio::test(start_paused = true)]
async fn given_steady_callers_when_running_a_minute_then_roughly_rate_plus_burst_allowed() {
    let rpm = 120;
    let limiter = RateLimiter::new(rpm);
    let burst = limiter.burst().unwrap_or_default();

    let mut allowed = 0;
    for _ in 0..600 {
        if limiter.allow() {
            allowed += 1;
        }
        advance(Duration::from_millis(100)).await;
    }

    assert!(allowed >= rpm, "allowed {allowed} < {rpm}");
    assert!(allowed <= rpm + burst + 1, "allowed {allowed} exceeds rate plus burst");
}

#[tokio::test(start_paused = true)]
async fn given_empty_bucket_when_waiting_then_blocks_until_refill() {
    let limiter = RateLimiter::new(60);
    while limiter.allow() {}

    let mut waiter = task::spawn(limiter.wait());
    assert_pending!(waiter.poll());

    advance(Duration::from_millis(1100)).await;
    assert_ready!(waiter.poll());
}

#[tokio::test(start_paused = true)]
async fn given_empty_bucket_when_waiting_with_short_timeout_then_gives_up_without_consuming() {
    let limiter = RateLimiter::new(60);
    while limiter.allow() {}

    assert!(!limiter.wait_timeout(Duration::from_millis(10)).await);

    advance(Duration::from_secs(1)).await;
    assert!(limiter.allow());
}

#[tokio::test(start_paused = true)]
async fn given_empty_bucket_when_acquiring_within_timeout_then_error_reports_wait() {
    let limiter = RateLimiter::new(60);
    while limiter.allow() {}

    let err = limiter
        .acquire_within(Duration::from_millis(5))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Rate limiter wait timed out"));
}

#[tokio::test(start_paused = true)]
async fn given_reservation_when_cancelled_then_token_returned() {
    let limiter = RateLimiter::new(60);
    for _ in 0..9 {
        assert!(limiter.allow());
    }

    let reservation = limiter.reserve();
    assert_eq!(reservation.delay(), Duration::ZERO);
    reservation.cancel();

    assert!(limiter.allow());
    assert!(!limiter.allow());
}

#[tokio::test(start_paused = true)]
async fn given_empty_bucket_when_reserving_then_delay_reflects_refill_time() {
    let limiter = RateLimiter::new(60);
    while limiter.allow() {}

    let reservation = limiter.reserve();
    assert!(reservation.delay() > Duration::from_millis(900));
    assert!(reservation.delay() <= Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn given_live_rate_change_when_refilling_then_new_rate_applies() {
    let limiter = RateLimiter::new(60);
    while limiter.allow() {}

    limiter.set_requests_per_minute(600.0);
    assert_eq!(limiter.requests_per_minute(), Some(600.0));

    advance(Duration::from_millis(250)).await;
    assert!(limiter.allow());
    assert!(limiter.allow());
    assert!(!limiter.allow());
}

#[tokio::test(start_paused = true)]
async fn given_non_positive_rate_when_set_then_ignored() {
    let limiter = RateLimiter::new(60);
    limiter.set_requests_per_minute(0.0);
    limiter.set_requests_per_minute(-5.0);
    assert_eq!(limiter.requests_per_minute(), Some(60.0));
}
