//! Source adapter contract and per-query result types.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http_client::HttpRequest;
use crate::policy::AdapterConfig;
use crate::{Alert, SourceFilter, SourceType};

/// Failure classification for a single query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    /// The requested source has no registered adapter.
    AdapterNotRegistered,
    /// The source's circuit breaker short-circuited the call.
    CircuitOpen,
    /// The local rate gate denied the call before any network traffic.
    RateLimited,
    /// Network-level failure: timeout, connection error, aborted request.
    Transport,
    /// The source answered with a non-success status.
    Upstream,
    Internal,
}

/// Structured error carried inside a failed [`SourceResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn adapter_not_registered(source: SourceType) -> Self {
        Self {
            kind: SourceErrorKind::AdapterNotRegistered,
            message: format!("no adapter registered for source '{source}'"),
            retryable: false,
        }
    }

    pub fn circuit_open(source: SourceType) -> Self {
        Self {
            kind: SourceErrorKind::CircuitOpen,
            message: format!("circuit breaker is open for source '{source}'"),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Transport,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Upstream,
            message: format!("status {status}: {}", message.into()),
            retryable: status == 429 || status >= 500,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    /// True when the failure says something about the backend's health and
    /// should count toward the circuit breaker. Local denials do not.
    pub const fn counts_as_backend_failure(&self) -> bool {
        matches!(
            self.kind,
            SourceErrorKind::Transport | SourceErrorKind::Upstream
        )
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::AdapterNotRegistered => "source.adapter_not_registered",
            SourceErrorKind::CircuitOpen => "source.circuit_open",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::Transport => "source.transport",
            SourceErrorKind::Upstream => "source.upstream",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Cache disposition of a completed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheInfo {
    pub hit: bool,
    pub age_secs: u64,
}

/// Per-query unit of return. Failures are values, never panics or `Err`s:
/// `success == false` implies empty data and a populated error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceResult {
    pub source: SourceType,
    pub success: bool,
    pub data: Vec<Alert>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SourceError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_info: Option<CacheInfo>,
}

impl SourceResult {
    pub fn success(source: SourceType, data: Vec<Alert>) -> Self {
        Self {
            source,
            success: true,
            data,
            error: None,
            cache_info: None,
        }
    }

    pub fn failure(source: SourceType, error: SourceError) -> Self {
        Self {
            source,
            success: false,
            data: Vec::new(),
            error: Some(error),
            cache_info: None,
        }
    }

    pub fn with_cache_info(mut self, cache_info: CacheInfo) -> Self {
        self.cache_info = Some(cache_info);
        self
    }
}

/// Per-source strategy: translate a generic filter into a source-specific
/// request, and a raw payload into canonical alerts.
///
/// Implementations hold no transport state; all I/O, retry, caching, and
/// rate limiting live in the shared execution path.
///
/// # Contract
///
/// - `build_request` is pure and idempotent: the same filter yields an
///   identical request. `None` means the source has no live backend, and the
///   query resolves to an empty success without touching the network.
/// - `normalize` is total: a payload missing the expected top-level array
///   yields `[]`, malformed items are best-effort mapped with defaults, and
///   it never panics.
pub trait SourceAdapter: Send + Sync {
    fn source_type(&self) -> SourceType;

    fn config(&self) -> &AdapterConfig;

    fn build_request(&self, filter: &SourceFilter) -> Option<HttpRequest>;

    fn normalize(&self, payload: &Value) -> Vec<Alert>;
}
