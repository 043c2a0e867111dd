//! Token-bucket enforcement of declared source rate limits.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

use crate::policy::RateLimitPolicy;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Per-adapter token bucket built from a [`RateLimitPolicy`].
///
/// When both hourly and per-minute budgets are declared the tighter one wins;
/// burst capacity comes from the policy's `burst_limit`.
#[derive(Clone)]
pub struct RateGate {
    limiter: Arc<DirectRateLimiter>,
    /// Steady-state spacing between requests, reported on denial as the
    /// suggested wait.
    period: Duration,
}

impl RateGate {
    pub fn from_policy(policy: &RateLimitPolicy) -> Self {
        let (window, limit) = effective_window(policy);
        let burst = policy.burst_limit.unwrap_or(limit).clamp(1, limit.max(1));
        let (quota, period) = quota_from_window(window, limit, burst);
        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
            period,
        }
    }

    /// Tries to take one cell of budget. On denial returns the suggested
    /// wait; the caller must not issue a network call.
    pub fn acquire(&self) -> Result<(), Duration> {
        if self.limiter.check().is_ok() {
            Ok(())
        } else {
            Err(self.period)
        }
    }
}

fn effective_window(policy: &RateLimitPolicy) -> (Duration, u32) {
    let hourly = (policy.requests_per_hour.max(1), Duration::from_secs(3_600));
    match policy.requests_per_minute {
        Some(per_minute) => {
            let per_minute = per_minute.max(1);
            let minute_rate = f64::from(per_minute) / 60.0;
            let hourly_rate = f64::from(hourly.0) / 3_600.0;
            if minute_rate < hourly_rate {
                (Duration::from_secs(60), per_minute)
            } else {
                (hourly.1, hourly.0)
            }
        }
        None => (hourly.1, hourly.0),
    }
}

fn quota_from_window(window: Duration, limit: u32, burst: u32) -> (Quota, Duration) {
    let safe_limit = limit.max(1);
    let burst = NonZeroU32::new(burst.max(1)).expect("burst is clamped to at least one");

    let seconds_per_cell = (window.as_secs_f64() / f64::from(safe_limit)).max(0.001);
    let period = Duration::from_secs_f64(seconds_per_cell);

    let quota = Quota::with_period(period)
        .expect("period is always greater than zero")
        .allow_burst(burst);
    (quota, period)
}
