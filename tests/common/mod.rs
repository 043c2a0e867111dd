//! Shared fixtures: a scripted transport and a configurable test adapter.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use regiq_core::{
    AdapterConfig, Alert, AuthPolicy, CachePolicy, CircuitBreakerPolicy, HttpClient, HttpError,
    HttpRequest, HttpResponse, RateLimitPolicy, RetryPolicy, SourceAdapter, SourceFilter,
    SourceType,
};

/// Transport that replays a fixed script of responses, then falls back to an
/// empty JSON object. Records every request it saw.
pub struct ScriptedTransport {
    script: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Option<Duration>,
    fallback_body: Option<String>,
    fallback_error: Option<String>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<HttpResponse, HttpError>>) -> Self {
        let mut script = script;
        script.reverse();
        Self {
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay: None,
            fallback_body: None,
            fallback_error: None,
        }
    }

    pub fn always_ok(body: &str) -> Self {
        let mut transport = Self::new(Vec::new());
        transport.fallback_body = Some(body.to_owned());
        transport
    }

    pub fn always_err(message: &str) -> Self {
        let mut transport = Self::new(Vec::new());
        transport.fallback_error = Some(message.to_owned());
        transport
    }

    /// Adds an artificial per-call delay so overlapping calls are observable.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were in flight at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for ScriptedTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            self.requests.lock().unwrap().push(request);
            let next = self.script.lock().unwrap().pop();
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match next {
                Some(outcome) => outcome,
                None => {
                    if let Some(message) = &self.fallback_error {
                        Err(HttpError::new(message.clone()))
                    } else {
                        Ok(HttpResponse::ok_json(
                            self.fallback_body.clone().unwrap_or_else(|| "{}".into()),
                        ))
                    }
                }
            }
        })
    }
}

/// Adapter with a fast policy for exercising retries, breakers, and gating
/// without real-world delays.
pub struct TestAdapter {
    source: SourceType,
    config: AdapterConfig,
}

impl TestAdapter {
    pub fn new(source: SourceType) -> Self {
        Self {
            source,
            config: fast_config(),
        }
    }

    pub fn with_config(source: SourceType, config: AdapterConfig) -> Self {
        Self { source, config }
    }
}

impl SourceAdapter for TestAdapter {
    fn source_type(&self) -> SourceType {
        self.source
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn build_request(&self, _filter: &SourceFilter) -> Option<HttpRequest> {
        Some(HttpRequest::get(format!(
            "http://upstream.test/{}",
            self.source.as_str()
        )))
    }

    fn normalize(&self, payload: &Value) -> Vec<Alert> {
        let Some(items) = payload.get("items").and_then(Value::as_array) else {
            return Vec::new();
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let id = item
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("item-{index}"));
                Alert::new(self.source, id)
            })
            .collect()
    }
}

/// Millisecond-scale retry schedule, no cache, a generous rate budget, and a
/// two-failure breaker with a short reset.
pub fn fast_config() -> AdapterConfig {
    AdapterConfig {
        auth: AuthPolicy::None,
        rate_limit: RateLimitPolicy {
            requests_per_hour: 1_000_000,
            requests_per_minute: None,
            burst_limit: Some(1_000),
        },
        retry: RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            exponential_base: 2.0,
            jitter: false,
        },
        cache: CachePolicy::disabled(),
        circuit_breaker: CircuitBreakerPolicy {
            failure_threshold: 2,
            reset_timeout: Duration::from_millis(50),
        },
        timeout: Duration::from_secs(5),
    }
}
