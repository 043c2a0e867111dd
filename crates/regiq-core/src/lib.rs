//! # RegIQ Core
//!
//! Multi-source regulatory data ingestion and normalization for RegIQ.
//!
//! ## Overview
//!
//! This crate provides the ingestion core:
//!
//! - **Canonical alert model** with a four-level urgency classification
//! - **Per-source adapters** (FDA, USDA, FSIS, WHO, plus placeholders for
//!   every other declared agency)
//! - **Execution policy** per source: auth, hard timeouts, retry with
//!   exponential backoff, token-bucket rate limiting, TTL/ETag caching
//! - **Circuit breakers** guarding repeatedly failing backends
//! - **A registry** dispatching single and batched queries
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapter`] | Source adapter contract and per-query result types |
//! | [`adapters`] | Concrete adapters (FDA, USDA, FSIS, WHO, placeholder) |
//! | [`cache`] | TTL/ETag response cache |
//! | [`circuit_breaker`] | Per-source circuit breaker |
//! | [`domain`] | Canonical models (Alert, Urgency, UtcDateTime) |
//! | [`error`] | Core error types |
//! | [`filter`] | Query filters callers construct |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`policy`] | Per-source execution policy objects |
//! | [`registry`] | Adapter registry and batched dispatch |
//! | [`retry`] | Backoff scheduling |
//! | [`secrets`] | Injectable API-key lookup |
//! | [`throttling`] | Token-bucket rate gate |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use regiq_core::{SourceAdapterRegistry, SourceFilter, SourceType};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = SourceAdapterRegistry::builder()
//!         .with_reqwest_client()
//!         .with_env_keys()
//!         .build();
//!
//!     let filter = SourceFilter::new(SourceType::Fda).with_text("query", "listeria");
//!     let result = registry.execute_query(&filter).await;
//!
//!     for alert in &result.data {
//!         println!("[{}] {}", alert.urgency, alert.title);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  Caller (CLI,    │
//! │  sync jobs)      │
//! └────────┬─────────┘
//!          │ SourceFilter
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ Registry         │────▶│ Circuit Breaker  │ (one per source)
//! └────────┬─────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ Adapter Runner   │────▶│ Rate Gate, Cache │
//! │ (retry, timeout) │     │ Retry schedule   │
//! └────────┬─────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ Source Adapter   │────▶│ HTTP Client      │
//! │ (build/normalize)│     │ (reqwest/noop)   │
//! └────────┬─────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ Alert records    │
//! └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Queries never return `Err` and never panic: every failure is a value on
//! [`SourceResult`], so call sites branch uniformly on `success`/`error`:
//!
//! ```rust,ignore
//! let result = registry.execute_query(&filter).await;
//! if !result.success {
//!     if let Some(error) = &result.error {
//!         eprintln!("{} failed: {error}", result.source);
//!     }
//! }
//! ```

pub mod adapter;
pub mod adapters;
pub mod cache;
pub mod circuit_breaker;
pub mod domain;
pub mod error;
pub mod filter;
pub mod http_client;
pub mod policy;
pub mod registry;
pub mod retry;
pub mod runner;
pub mod secrets;
pub mod source;
pub mod throttling;

// Adapter contract and results
pub use adapter::{CacheInfo, SourceAdapter, SourceError, SourceErrorKind, SourceResult};

// Concrete adapters
pub use adapters::{FdaAdapter, FsisAdapter, PlaceholderAdapter, UsdaAdapter, WhoAdapter};

// Caching
pub use cache::{CachedResponse, ResponseCache};

// Circuit breaker
pub use circuit_breaker::{CircuitBreaker, CircuitState};

// Domain models
pub use domain::{Alert, Urgency, UtcDateTime};

// Error types
pub use error::ValidationError;

// Filters
pub use filter::{FilterValue, SourceFilter};

// HTTP transport
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};

// Policy objects
pub use policy::{
    AdapterConfig, AuthPolicy, CachePolicy, CircuitBreakerPolicy, RateLimitPolicy, RetryPolicy,
};

// Registry
pub use registry::{RegistryBuilder, SourceAdapterRegistry, SourceHealth};

// Retry scheduling
pub use retry::{Backoff, RetryConfig};

// Execution policy
pub use runner::AdapterRunner;

// API keys
pub use secrets::{ApiKeyProvider, EnvKeyProvider, NoKeys, StaticKeys};

// Source identifiers
pub use source::SourceType;

// Throttling
pub use throttling::RateGate;
