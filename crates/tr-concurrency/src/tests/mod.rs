mod parallel;
mod rate_limiter;
