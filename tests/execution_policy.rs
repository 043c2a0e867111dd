//! Runner-level tests: retries, rate gating, caching, and auth attachment.

mod common;

use std::sync::Arc;
use std::time::Duration;

use regiq_core::{
    AdapterRunner, AuthPolicy, CachePolicy, HttpError, HttpResponse, NoKeys, PlaceholderAdapter,
    SourceErrorKind, SourceFilter, SourceType, StaticKeys,
};

use common::{fast_config, ScriptedTransport, TestAdapter};

fn runner_with(
    transport: Arc<ScriptedTransport>,
    adapter: TestAdapter,
) -> AdapterRunner {
    AdapterRunner::new(Arc::new(adapter), transport, Arc::new(NoKeys))
}

#[tokio::test]
async fn transient_transport_errors_are_retried_until_success() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Err(HttpError::new("connection reset")),
        Err(HttpError::new("connection reset")),
        Ok(HttpResponse::ok_json(r#"{"items": [{"id": "a1"}]}"#)),
    ]));
    let runner = runner_with(transport.clone(), TestAdapter::new(SourceType::Fda));

    let result = runner.execute(&SourceFilter::new(SourceType::Fda)).await;

    assert!(result.success, "third attempt should have succeeded");
    assert_eq!(result.data.len(), 1);
    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn exhausted_retries_surface_a_transport_failure() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Err(HttpError::new("connection reset")),
        Err(HttpError::new("connection reset")),
        Err(HttpError::new("connection reset")),
    ]));
    let runner = runner_with(transport.clone(), TestAdapter::new(SourceType::Fda));

    let result = runner.execute(&SourceFilter::new(SourceType::Fda)).await;

    assert!(!result.success);
    let error = result.error.expect("failure carries its error");
    assert_eq!(error.kind(), SourceErrorKind::Transport);
    assert_eq!(transport.calls(), 3, "retry budget is three attempts");
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let transport = Arc::new(ScriptedTransport::new(vec![Ok(HttpResponse::with_status(
        404,
        r#"{"error": "not found"}"#,
    ))]));
    let runner = runner_with(transport.clone(), TestAdapter::new(SourceType::Usda));

    let result = runner.execute(&SourceFilter::new(SourceType::Usda)).await;

    assert!(!result.success);
    let error = result.error.expect("failure carries its error");
    assert_eq!(error.kind(), SourceErrorKind::Upstream);
    assert!(!error.retryable());
    assert_eq!(transport.calls(), 1, "404 must not be retried");
}

#[tokio::test]
async fn throttling_responses_are_retried() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Ok(HttpResponse::with_status(429, "slow down")),
        Ok(HttpResponse::ok_json("{}")),
    ]));
    let runner = runner_with(transport.clone(), TestAdapter::new(SourceType::Who));

    let result = runner.execute(&SourceFilter::new(SourceType::Who)).await;

    assert!(result.success);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn exhausted_rate_budget_denies_before_the_network() {
    let mut config = fast_config();
    config.rate_limit.requests_per_hour = 1;
    config.rate_limit.burst_limit = Some(1);
    let transport = Arc::new(ScriptedTransport::always_ok("{}"));
    let runner = runner_with(
        transport.clone(),
        TestAdapter::with_config(SourceType::Fda, config),
    );
    let filter = SourceFilter::new(SourceType::Fda);

    let first = runner.execute(&filter).await;
    let second = runner.execute(&filter).await;

    assert!(first.success);
    assert!(!second.success);
    let error = second.error.expect("denial carries its error");
    assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    assert_eq!(transport.calls(), 1, "denied call must not reach the wire");
}

#[tokio::test]
async fn fresh_cache_hits_short_circuit_the_transport() {
    let mut config = fast_config();
    config.cache = CachePolicy {
        ttl: Duration::from_secs(300),
        revalidate: false,
    };
    let transport = Arc::new(ScriptedTransport::always_ok(r#"{"items": [{"id": "c1"}]}"#));
    let runner = runner_with(
        transport.clone(),
        TestAdapter::with_config(SourceType::Fda, config),
    );
    let filter = SourceFilter::new(SourceType::Fda);

    let first = runner.execute(&filter).await;
    let second = runner.execute(&filter).await;

    assert!(first.success && second.success);
    assert_eq!(second.data.len(), 1);
    let cache_info = second.cache_info.expect("cached result reports its origin");
    assert!(cache_info.hit);
    assert_eq!(transport.calls(), 1, "second call should be served from cache");
}

#[tokio::test]
async fn stale_entries_revalidate_with_etags() {
    let mut config = fast_config();
    // Zero TTL keeps every entry stale so each call revalidates.
    config.cache = CachePolicy {
        ttl: Duration::ZERO,
        revalidate: true,
    };
    let transport = Arc::new(ScriptedTransport::new(vec![
        Ok(HttpResponse::ok_json(r#"{"items": [{"id": "e1"}]}"#)
            .with_header("etag", "\"v1\"")),
        Ok(HttpResponse::with_status(304, "")),
    ]));
    let runner = runner_with(
        transport.clone(),
        TestAdapter::with_config(SourceType::Fda, config),
    );
    let filter = SourceFilter::new(SourceType::Fda);

    let first = runner.execute(&filter).await;
    let second = runner.execute(&filter).await;

    assert!(first.success && second.success);
    assert_eq!(
        second.data.len(),
        1,
        "304 should resolve to the cached body"
    );
    assert!(second.cache_info.expect("revalidated hit").hit);

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1].headers.get("if-none-match").map(String::as_str),
        Some("\"v1\"")
    );
}

#[tokio::test]
async fn unsolicited_304_reports_a_miss_with_no_body() {
    let mut config = fast_config();
    config.cache = CachePolicy {
        ttl: Duration::ZERO,
        revalidate: true,
    };
    // First-ever response is a 304: nothing was cached, nothing to serve.
    let transport = Arc::new(ScriptedTransport::new(vec![Ok(HttpResponse::with_status(
        304, "",
    ))]));
    let runner = runner_with(
        transport,
        TestAdapter::with_config(SourceType::Fda, config),
    );

    let result = runner.execute(&SourceFilter::new(SourceType::Fda)).await;

    assert!(result.success);
    assert!(result.data.is_empty());
    let cache_info = result.cache_info.expect("cache outcome is reported");
    assert!(!cache_info.hit);
}

#[tokio::test]
async fn declared_auth_is_attached_when_a_key_exists() {
    let mut config = fast_config();
    config.auth = AuthPolicy::Header {
        name: String::from("X-Api-Key"),
    };
    let transport = Arc::new(ScriptedTransport::always_ok("{}"));
    let keys = StaticKeys::new().with_key(SourceType::Usda, "secret-key");
    let runner = AdapterRunner::new(
        Arc::new(TestAdapter::with_config(SourceType::Usda, config)),
        transport.clone(),
        Arc::new(keys),
    );

    let result = runner.execute(&SourceFilter::new(SourceType::Usda)).await;

    assert!(result.success);
    let requests = transport.requests();
    assert_eq!(
        requests[0].headers.get("x-api-key").map(String::as_str),
        Some("secret-key")
    );
}

#[tokio::test]
async fn sources_without_a_backend_resolve_offline() {
    let transport = Arc::new(ScriptedTransport::always_ok("{}"));
    let runner = AdapterRunner::new(
        Arc::new(PlaceholderAdapter::new(SourceType::Cdc)),
        transport.clone(),
        Arc::new(NoKeys),
    );

    let result = runner.execute(&SourceFilter::new(SourceType::Cdc)).await;

    assert!(result.success);
    assert!(result.data.is_empty());
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn unparseable_bodies_degrade_to_no_alerts() {
    let transport = Arc::new(ScriptedTransport::new(vec![Ok(HttpResponse::ok_json(
        "this is not json {",
    ))]));
    let runner = runner_with(transport, TestAdapter::new(SourceType::Fda));

    let result = runner.execute(&SourceFilter::new(SourceType::Fda)).await;

    assert!(result.success);
    assert!(result.data.is_empty());
}
