//! In-memory caching of raw source responses.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    stored_at: Instant,
}

/// Snapshot of a cached response handed back to the execution path.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub body: String,
    pub etag: Option<String>,
    pub age: Duration,
    /// Whether the entry is still within the caller's TTL.
    pub fresh: bool,
}

/// Thread-safe response cache keyed by request URL.
///
/// Freshness is decided per lookup against the caller's TTL, so one cache can
/// serve adapters with different cache policies.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    inner: Arc<tokio::sync::RwLock<HashMap<String, CacheEntry>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lookup(&self, key: &str, ttl: Duration) -> Option<CachedResponse> {
        let map = self.inner.read().await;
        map.get(key).map(|entry| {
            let age = entry.stored_at.elapsed();
            CachedResponse {
                body: entry.body.clone(),
                etag: entry.etag.clone(),
                age,
                fresh: age <= ttl,
            }
        })
    }

    pub async fn store(&self, key: impl Into<String>, body: String, etag: Option<String>) {
        let mut map = self.inner.write().await;
        map.insert(
            key.into(),
            CacheEntry {
                body,
                etag,
                stored_at: Instant::now(),
            },
        );
    }

    /// Marks an entry as fresh again after a 304 revalidation.
    pub async fn touch(&self, key: &str) {
        let mut map = self.inner.write().await;
        if let Some(entry) = map.get_mut(key) {
            entry.stored_at = Instant::now();
        }
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_reports_freshness_against_ttl() {
        let cache = ResponseCache::new();
        cache
            .store("https://example.test/a", String::from("{}"), None)
            .await;

        let hit = cache
            .lookup("https://example.test/a", Duration::from_secs(60))
            .await
            .expect("entry must exist");
        assert!(hit.fresh);

        let stale = cache
            .lookup("https://example.test/a", Duration::ZERO)
            .await
            .expect("entry must exist");
        assert!(!stale.fresh);
    }

    #[tokio::test]
    async fn touch_refreshes_a_stale_entry() {
        let cache = ResponseCache::new();
        cache
            .store(
                "k",
                String::from("body"),
                Some(String::from("\"etag-1\"")),
            )
            .await;

        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.touch("k").await;

        let hit = cache
            .lookup("k", Duration::from_millis(4))
            .await
            .expect("entry must exist");
        assert!(hit.fresh);
        assert_eq!(hit.etag.as_deref(), Some("\"etag-1\""));
    }

    #[tokio::test]
    async fn missing_keys_return_none() {
        let cache = ResponseCache::new();
        assert!(cache.lookup("absent", Duration::from_secs(1)).await.is_none());
        assert!(cache.is_empty().await);
    }
}
