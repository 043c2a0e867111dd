use std::time::Duration;

use crate::http_client::HttpRequest;
use crate::SourceType;

/// How an API key is attached to an outgoing request, when one is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Source accepts unauthenticated requests.
    None,
    /// Key goes into a custom header (`X-Api-Key: <key>`).
    Header { name: String },
    /// Key goes into the query string (`?api_key=<key>`).
    QueryParam { name: String },
    /// Key goes into `Authorization: Bearer <key>`.
    Bearer,
}

impl AuthPolicy {
    /// Attaches `key` to the request per this policy.
    pub fn apply(&self, request: HttpRequest, key: &str) -> HttpRequest {
        match self {
            Self::None => request,
            Self::Header { name } => request.with_header(name.as_str(), key),
            Self::QueryParam { name } => request.with_query_param(name, key),
            Self::Bearer => request.with_header("authorization", format!("Bearer {key}")),
        }
    }
}

/// Declared request budget for a source. Enforced by a token bucket per
/// adapter instance; the tighter of the two windows wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub requests_per_hour: u32,
    pub requests_per_minute: Option<u32>,
    pub burst_limit: Option<u32>,
}

/// Retry schedule for transient failures.
///
/// Delay before attempt `n` (1-based retries) is
/// `min(max_delay, base_delay * exponential_base^(n-1))`, optionally jittered
/// by +/- 50%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first call.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub exponential_base: f64,
    pub jitter: bool,
}

/// Response-cache behavior for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Freshness window. Zero means every entry is immediately stale.
    pub ttl: Duration,
    /// Revalidate stale entries with `If-None-Match` when an ETag is held.
    pub revalidate: bool,
}

impl CachePolicy {
    pub const fn disabled() -> Self {
        Self {
            ttl: Duration::ZERO,
            revalidate: false,
        }
    }

    /// Whether responses are stored at all. A zero TTL with revalidation
    /// still caches: entries are always stale but refresh via ETags.
    pub const fn enabled(&self) -> bool {
        !self.ttl.is_zero() || self.revalidate
    }
}

/// Circuit-breaker thresholds for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerPolicy {
    pub failure_threshold: u32,
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerPolicy {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(300),
        }
    }
}

/// Immutable execution policy attached to an adapter at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    pub auth: AuthPolicy,
    pub rate_limit: RateLimitPolicy,
    pub retry: RetryPolicy,
    pub cache: CachePolicy,
    pub circuit_breaker: CircuitBreakerPolicy,
    pub timeout: Duration,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            auth: AuthPolicy::None,
            rate_limit: RateLimitPolicy {
                requests_per_hour: 1_000,
                requests_per_minute: Some(60),
                burst_limit: Some(10),
            },
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(500),
                max_delay: Duration::from_secs(30),
                exponential_base: 2.0,
                jitter: true,
            },
            cache: CachePolicy {
                ttl: Duration::from_secs(300),
                revalidate: true,
            },
            circuit_breaker: CircuitBreakerPolicy::default(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl AdapterConfig {
    /// openFDA enforcement endpoint. Generous public quota, key optional.
    pub fn fda_default() -> Self {
        Self {
            auth: AuthPolicy::QueryParam {
                name: String::from("api_key"),
            },
            rate_limit: RateLimitPolicy {
                requests_per_hour: 1_000,
                requests_per_minute: Some(240),
                burst_limit: Some(20),
            },
            cache: CachePolicy {
                ttl: Duration::from_secs(600),
                revalidate: true,
            },
            ..Self::default()
        }
    }

    pub fn usda_default() -> Self {
        Self {
            auth: AuthPolicy::Header {
                name: String::from("X-Api-Key"),
            },
            rate_limit: RateLimitPolicy {
                requests_per_hour: 500,
                requests_per_minute: Some(30),
                burst_limit: Some(5),
            },
            ..Self::default()
        }
    }

    /// FSIS serves raw recall dumps; calls are slow, so the timeout is wider
    /// and the retry schedule more patient.
    pub fn fsis_default() -> Self {
        Self {
            auth: AuthPolicy::None,
            rate_limit: RateLimitPolicy {
                requests_per_hour: 200,
                requests_per_minute: Some(10),
                burst_limit: Some(3),
            },
            retry: RetryPolicy {
                max_attempts: 4,
                base_delay: Duration::from_secs(1),
                max_delay: Duration::from_secs(60),
                exponential_base: 2.0,
                jitter: true,
            },
            timeout: Duration::from_secs(20),
            ..Self::default()
        }
    }

    pub fn who_default() -> Self {
        Self {
            auth: AuthPolicy::None,
            rate_limit: RateLimitPolicy {
                requests_per_hour: 300,
                requests_per_minute: Some(20),
                burst_limit: Some(5),
            },
            cache: CachePolicy {
                ttl: Duration::from_secs(900),
                revalidate: false,
            },
            ..Self::default()
        }
    }

    /// Conservative budget for placeholder sources; no network traffic is
    /// ever issued for them, but the registry still tracks their state.
    pub fn placeholder_default() -> Self {
        Self {
            auth: AuthPolicy::None,
            cache: CachePolicy::disabled(),
            ..Self::default()
        }
    }

    pub fn default_for(source: SourceType) -> Self {
        match source {
            SourceType::Fda => Self::fda_default(),
            SourceType::Usda => Self::usda_default(),
            SourceType::Fsis => Self::fsis_default(),
            SourceType::Who => Self::who_default(),
            _ => Self::placeholder_default(),
        }
    }
}
