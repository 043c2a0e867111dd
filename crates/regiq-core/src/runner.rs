//! Shared execution policy wrapping every adapter call.
//!
//! The runner owns everything cross-cutting: auth attachment, the response
//! cache, the rate gate, the hard request timeout, and the retry schedule.
//! Adapters stay pure translation layers.

use std::sync::Arc;

use serde_json::Value;

use crate::adapter::{CacheInfo, SourceAdapter, SourceError, SourceResult};
use crate::cache::{CachedResponse, ResponseCache};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::retry::RetryConfig;
use crate::secrets::ApiKeyProvider;
use crate::throttling::RateGate;
use crate::SourceType;

enum FetchOutcome {
    Fresh(HttpResponse),
    NotModified,
}

/// Executes one adapter under its declared policy.
///
/// [`execute`](Self::execute) always returns a [`SourceResult`]; no failure
/// mode escapes as `Err` or a panic.
pub struct AdapterRunner {
    adapter: Arc<dyn SourceAdapter>,
    http: Arc<dyn HttpClient>,
    keys: Arc<dyn ApiKeyProvider>,
    gate: RateGate,
    cache: ResponseCache,
    retry: RetryConfig,
}

impl AdapterRunner {
    pub fn new(
        adapter: Arc<dyn SourceAdapter>,
        http: Arc<dyn HttpClient>,
        keys: Arc<dyn ApiKeyProvider>,
    ) -> Self {
        let config = adapter.config();
        let gate = RateGate::from_policy(&config.rate_limit);
        let retry = RetryConfig::from_policy(&config.retry);
        Self {
            adapter,
            http,
            keys,
            gate,
            cache: ResponseCache::new(),
            retry,
        }
    }

    pub fn adapter(&self) -> &Arc<dyn SourceAdapter> {
        &self.adapter
    }

    pub async fn execute(&self, filter: &crate::SourceFilter) -> SourceResult {
        let source = self.adapter.source_type();
        let config = self.adapter.config();

        let Some(mut request) = self.adapter.build_request(filter) else {
            // No live backend for this source.
            return SourceResult::success(source, Vec::new());
        };

        if let Some(key) = self.keys.api_key(source) {
            request = config.auth.apply(request, &key);
        }
        request = request.with_timeout(config.timeout);

        let cache_key = request.url.clone();
        let mut stale: Option<CachedResponse> = None;
        if config.cache.enabled() {
            match self.cache.lookup(&cache_key, config.cache.ttl).await {
                Some(entry) if entry.fresh => {
                    tracing::debug!(
                        source = %source,
                        age_secs = entry.age.as_secs(),
                        "serving cached response"
                    );
                    let data = self.normalize_body(&entry.body);
                    return SourceResult::success(source, data).with_cache_info(CacheInfo {
                        hit: true,
                        age_secs: entry.age.as_secs(),
                    });
                }
                entry => stale = entry,
            }

            if config.cache.revalidate {
                if let Some(etag) = stale.as_ref().and_then(|entry| entry.etag.clone()) {
                    request = request.with_header("if-none-match", etag);
                }
            }
        }

        if let Err(wait) = self.gate.acquire() {
            tracing::warn!(
                source = %source,
                wait_secs = wait.as_secs_f64(),
                "rate budget exhausted"
            );
            return SourceResult::failure(
                source,
                SourceError::rate_limited(format!(
                    "rate budget exhausted for '{source}'; retry in {:.1}s",
                    wait.as_secs_f64()
                )),
            );
        }

        match self.fetch_with_retry(&request, source).await {
            Ok(FetchOutcome::Fresh(response)) => {
                let data = self.normalize_body(&response.body);
                if config.cache.enabled() {
                    let etag = response.etag().map(str::to_owned);
                    self.cache.store(cache_key, response.body, etag).await;
                    return SourceResult::success(source, data)
                        .with_cache_info(CacheInfo { hit: false, age_secs: 0 });
                }
                SourceResult::success(source, data)
            }
            Ok(FetchOutcome::NotModified) => match stale {
                Some(entry) => {
                    self.cache.touch(&cache_key).await;
                    let data = self.normalize_body(&entry.body);
                    SourceResult::success(source, data).with_cache_info(CacheInfo {
                        hit: true,
                        age_secs: entry.age.as_secs(),
                    })
                }
                // A 304 with nothing cached is an upstream anomaly; there is
                // no body to serve, so this cannot be reported as a hit.
                None => {
                    tracing::warn!(source = %source, "304 response without a cached entry");
                    SourceResult::success(source, Vec::new())
                        .with_cache_info(CacheInfo { hit: false, age_secs: 0 })
                }
            },
            Err(error) => SourceResult::failure(source, error),
        }
    }

    async fn fetch_with_retry(
        &self,
        request: &HttpRequest,
        source: SourceType,
    ) -> Result<FetchOutcome, SourceError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.http.execute(request.clone()).await {
                Ok(response) if response.status == 304 => {
                    return Ok(FetchOutcome::NotModified);
                }
                Ok(response) if response.is_success() => {
                    return Ok(FetchOutcome::Fresh(response));
                }
                Ok(response) => {
                    if self.retry.should_retry_status(response.status)
                        && attempt < self.retry.max_attempts
                    {
                        let delay = self.retry.delay_for_retry(attempt);
                        tracing::debug!(
                            source = %source,
                            status = response.status,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "retrying after upstream error"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(SourceError::upstream(
                        response.status,
                        snippet(&response.body),
                    ));
                }
                Err(transport) => {
                    if transport.retryable() && attempt < self.retry.max_attempts {
                        let delay = self.retry.delay_for_retry(attempt);
                        tracing::debug!(
                            source = %source,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = transport.message(),
                            "retrying after transport error"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(SourceError::transport(transport.message()));
                }
            }
        }
    }

    /// Unparseable bodies are malformed payloads, and malformed payloads
    /// degrade to no alerts rather than a failure.
    fn normalize_body(&self, body: &str) -> Vec<crate::Alert> {
        let payload = serde_json::from_str::<Value>(body).unwrap_or(Value::Null);
        self.adapter.normalize(&payload)
    }
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::from("upstream error");
    }
    trimmed.chars().take(120).collect()
}
