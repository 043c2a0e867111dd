//! Adapter ownership, dispatch, and per-source circuit protection.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adapter::{SourceAdapter, SourceError, SourceResult};
use crate::adapters::{FdaAdapter, FsisAdapter, PlaceholderAdapter, UsdaAdapter, WhoAdapter};
use crate::circuit_breaker::CircuitBreaker;
use crate::policy::AdapterConfig;
use crate::http_client::{HttpClient, NoopHttpClient, ReqwestHttpClient};
use crate::runner::AdapterRunner;
use crate::secrets::{ApiKeyProvider, EnvKeyProvider, NoKeys};
use crate::{SourceFilter, SourceType};

/// Queries executed concurrently within one batch of
/// [`execute_multiple_queries`](SourceAdapterRegistry::execute_multiple_queries).
const MAX_CONCURRENT_QUERIES: usize = 5;

/// Operational snapshot of one source, for health dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceHealth {
    pub available: bool,
    pub circuit_open: bool,
    pub failures: u32,
}

struct RegisteredSource {
    runner: AdapterRunner,
    breaker: CircuitBreaker,
}

struct RegistryInner {
    sources: BTreeMap<SourceType, RegisteredSource>,
}

/// Owns one adapter (and one circuit breaker) per configured source and
/// dispatches queries to them.
///
/// Explicitly constructed and cheap to clone; there is no global instance.
/// Every public operation returns values, never `Err`s and never panics —
/// all failure detail rides inside [`SourceResult`].
#[derive(Clone)]
pub struct SourceAdapterRegistry {
    inner: Arc<RegistryInner>,
}

impl Default for SourceAdapterRegistry {
    fn default() -> Self {
        RegistryBuilder::new().build()
    }
}

impl SourceAdapterRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Adapter lookup; unknown or disabled sources are `None`, not an error.
    pub fn get_adapter(&self, source: SourceType) -> Option<&Arc<dyn SourceAdapter>> {
        self.inner
            .sources
            .get(&source)
            .map(|entry| entry.runner.adapter())
    }

    /// Executes a single query under the source's policy and breaker.
    pub async fn execute_query(&self, filter: &SourceFilter) -> SourceResult {
        let Some(entry) = self.inner.sources.get(&filter.source) else {
            return SourceResult::failure(
                filter.source,
                SourceError::adapter_not_registered(filter.source),
            );
        };

        if !entry.breaker.allow_request() {
            tracing::warn!(source = %filter.source, "circuit open, short-circuiting query");
            return SourceResult::failure(filter.source, SourceError::circuit_open(filter.source));
        }

        let result = entry.runner.execute(filter).await;

        match &result.error {
            None => entry.breaker.record_success(),
            Some(error) if error.counts_as_backend_failure() => {
                entry.breaker.record_failure();
                if entry.breaker.is_open() {
                    tracing::warn!(
                        source = %filter.source,
                        failures = entry.breaker.consecutive_failures(),
                        "circuit opened"
                    );
                }
            }
            // Local denials (rate gate and friends) say nothing about the
            // backend and leave the breaker alone.
            Some(_) => {}
        }

        result
    }

    /// Executes many queries in strict batches of five.
    ///
    /// Queries within a batch run concurrently; the next batch starts only
    /// once every query in the current one has settled. The returned vector
    /// matches the input order regardless of completion order, and a
    /// panicked query degrades to a failed result for its slot.
    pub async fn execute_multiple_queries(&self, filters: Vec<SourceFilter>) -> Vec<SourceResult> {
        let mut results = Vec::with_capacity(filters.len());

        for batch in filters.chunks(MAX_CONCURRENT_QUERIES) {
            let handles: Vec<_> = batch
                .iter()
                .cloned()
                .map(|filter| {
                    let registry = self.clone();
                    tokio::spawn(async move { registry.execute_query(&filter).await })
                })
                .collect();

            for (handle, filter) in handles.into_iter().zip(batch) {
                match handle.await {
                    Ok(result) => results.push(result),
                    Err(join_error) => results.push(SourceResult::failure(
                        filter.source,
                        SourceError::internal(format!("query task failed: {join_error}")),
                    )),
                }
            }
        }

        results
    }

    /// Every configured source, placeholders included.
    pub fn get_available_sources(&self) -> Vec<SourceType> {
        self.inner.sources.keys().copied().collect()
    }

    /// Breaker snapshot per source.
    pub fn get_source_health(&self) -> BTreeMap<SourceType, SourceHealth> {
        self.inner
            .sources
            .iter()
            .map(|(source, entry)| {
                let circuit_open = entry.breaker.is_open();
                (
                    *source,
                    SourceHealth {
                        available: !circuit_open,
                        circuit_open,
                        failures: entry.breaker.consecutive_failures(),
                    },
                )
            })
            .collect()
    }
}

/// Builder assembling a registry with injected transport, keys, and adapters.
///
/// Defaults are fully offline: live adapters over [`NoopHttpClient`] and no
/// API keys, which is what unit tests want. Production callers opt into the
/// reqwest transport and env-backed keys.
pub struct RegistryBuilder {
    http: Arc<dyn HttpClient>,
    keys: Arc<dyn ApiKeyProvider>,
    disabled: BTreeSet<SourceType>,
    overrides: Vec<Arc<dyn SourceAdapter>>,
    timeout: Option<Duration>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            http: Arc::new(NoopHttpClient),
            keys: Arc::new(NoKeys),
            disabled: BTreeSet::new(),
            overrides: Vec::new(),
            timeout: None,
        }
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = http;
        self
    }

    /// Production transport with real network calls and hard timeouts.
    pub fn with_reqwest_client(mut self) -> Self {
        self.http = Arc::new(ReqwestHttpClient::new());
        self
    }

    pub fn with_key_provider(mut self, keys: Arc<dyn ApiKeyProvider>) -> Self {
        self.keys = keys;
        self
    }

    /// Reads `REGIQ_<SOURCE>_API_KEY` from the environment.
    pub fn with_env_keys(mut self) -> Self {
        self.keys = Arc::new(EnvKeyProvider);
        self
    }

    /// Leaves a source out of the registry entirely; queries against it will
    /// fail with `source.adapter_not_registered`.
    pub fn without_source(mut self, source: SourceType) -> Self {
        self.disabled.insert(source);
        self
    }

    /// Replaces the stock adapter for the adapter's own source.
    pub fn with_adapter(mut self, adapter: Arc<dyn SourceAdapter>) -> Self {
        self.overrides.push(adapter);
        self
    }

    /// Overrides the per-request timeout of every stock adapter. Adapters
    /// supplied through [`with_adapter`](Self::with_adapter) keep their own
    /// configured timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> SourceAdapterRegistry {
        let mut sources = BTreeMap::new();

        for source in SourceType::ALL {
            if self.disabled.contains(&source) {
                continue;
            }

            let adapter = self
                .overrides
                .iter()
                .find(|candidate| candidate.source_type() == source)
                .cloned()
                .unwrap_or_else(|| stock_adapter(source, self.timeout));

            let breaker = CircuitBreaker::new(adapter.config().circuit_breaker);
            let runner = AdapterRunner::new(adapter, self.http.clone(), self.keys.clone());

            sources.insert(source, RegisteredSource { runner, breaker });
        }

        SourceAdapterRegistry {
            inner: Arc::new(RegistryInner { sources }),
        }
    }
}

fn stock_adapter(source: SourceType, timeout: Option<Duration>) -> Arc<dyn SourceAdapter> {
    let mut config = AdapterConfig::default_for(source);
    if let Some(timeout) = timeout {
        config.timeout = timeout;
    }

    match source {
        SourceType::Fda => Arc::new(FdaAdapter::with_config(config)),
        SourceType::Usda => Arc::new(UsdaAdapter::with_config(config)),
        SourceType::Fsis => Arc::new(FsisAdapter::with_config(config)),
        SourceType::Who => Arc::new(WhoAdapter::with_config(config)),
        other => Arc::new(PlaceholderAdapter::with_config(other, config)),
    }
}
