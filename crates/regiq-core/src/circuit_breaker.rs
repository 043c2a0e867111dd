use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::policy::CircuitBreakerPolicy;

/// Runtime circuit state for a source's upstream calls.
///
/// There is deliberately no half-open state: once `reset_timeout` elapses the
/// next call is let through unguarded and its outcome decides what happens
/// next. Callers must not assume probe isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
}

#[derive(Debug)]
struct CircuitInner {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

impl Default for CircuitInner {
    fn default() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            opened_at: None,
        }
    }
}

/// Thread-safe circuit breaker guarding one source.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerPolicy,
    inner: Mutex<CircuitInner>,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerPolicy::default())
    }
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerPolicy) -> Self {
        Self {
            config,
            inner: Mutex::new(CircuitInner::default()),
        }
    }

    /// Whether a call may proceed. While open, requests are short-circuited
    /// until `reset_timeout` has elapsed; the first call after that passes
    /// through with the breaker still open.
    pub fn allow_request(&self) -> bool {
        let inner = self
            .inner
            .lock()
            .expect("circuit breaker lock is not poisoned");
        match inner.state {
            CircuitState::Closed => true,
            CircuitState::Open => inner
                .opened_at
                .map(|opened_at| opened_at.elapsed() >= self.config.reset_timeout)
                .unwrap_or(true),
        }
    }

    pub fn record_success(&self) {
        let mut inner = self
            .inner
            .lock()
            .expect("circuit breaker lock is not poisoned");
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.opened_at = None;
    }

    /// Counts one failure. Opening (or failing while already open) restarts
    /// the reset clock.
    pub fn record_failure(&self) {
        let mut inner = self
            .inner
            .lock()
            .expect("circuit breaker lock is not poisoned");
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);

        if inner.consecutive_failures >= self.config.failure_threshold {
            inner.state = CircuitState::Open;
            inner.opened_at = Some(Instant::now());
        }
    }

    pub fn state(&self) -> CircuitState {
        self.inner
            .lock()
            .expect("circuit breaker lock is not poisoned")
            .state
    }

    pub fn is_open(&self) -> bool {
        self.state() == CircuitState::Open
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.inner
            .lock()
            .expect("circuit breaker lock is not poisoned")
            .consecutive_failures
    }

    pub fn reset_timeout(&self) -> Duration {
        self.config.reset_timeout
    }
}
