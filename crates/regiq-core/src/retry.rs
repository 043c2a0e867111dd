//! Retry scheduling with exponential backoff and jitter.

use std::time::Duration;

use crate::policy::RetryPolicy;

/// Exponential backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub base: Duration,
    pub factor: f64,
    pub max: Duration,
    pub jitter: bool,
}

impl Backoff {
    pub fn from_policy(policy: &RetryPolicy) -> Self {
        Self {
            base: policy.base_delay,
            factor: policy.exponential_base,
            max: policy.max_delay,
            jitter: policy.jitter,
        }
    }

    /// Delay before retry number `retry` (1-based):
    /// `min(max, base * factor^(retry - 1))`, optionally jittered +/- 50%.
    pub fn delay(self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1);
        let scale = self.factor.powi(exponent as i32);
        let seconds = self.base.as_secs_f64() * scale;
        let capped = seconds.min(self.max.as_secs_f64());
        let mut delay = Duration::from_secs_f64(capped);

        if self.jitter {
            let jitter_ms = (delay.as_millis() as f64 * 0.5) as u64;
            let offset = fastrand::u64(0..=(jitter_ms * 2));
            let total_ms = delay.as_millis() as i64 + (offset as i64 - jitter_ms as i64);
            delay = Duration::from_millis(total_ms.max(0) as u64);
        }

        delay
    }
}

/// Full retry configuration derived from a source's [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first call.
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryConfig {
    pub fn from_policy(policy: &RetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts.max(1),
            backoff: Backoff::from_policy(policy),
        }
    }

    /// Transient statuses worth another attempt: timeouts, throttling, and
    /// server-side failures. Other 4xx statuses are the caller's fault and
    /// are never retried.
    pub fn should_retry_status(&self, status: u16) -> bool {
        status == 408 || status == 429 || (500..=599).contains(&status)
    }

    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        self.backoff.delay(retry)
    }
}
