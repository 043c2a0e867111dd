//! Contract tests every adapter must satisfy, live or placeholder.

use std::sync::Arc;

use serde_json::json;

use regiq_core::{
    FdaAdapter, FsisAdapter, PlaceholderAdapter, SourceAdapter, SourceFilter, SourceType,
    UsdaAdapter, WhoAdapter,
};

fn live_adapters() -> Vec<Arc<dyn SourceAdapter>> {
    vec![
        Arc::new(FdaAdapter::default()),
        Arc::new(UsdaAdapter::default()),
        Arc::new(FsisAdapter::default()),
        Arc::new(WhoAdapter::default()),
    ]
}

#[test]
fn live_adapters_build_identical_requests_for_identical_filters() {
    for adapter in live_adapters() {
        let filter = SourceFilter::new(adapter.source_type())
            .with_text("query", "listeria")
            .with_text("state", "CA")
            .with_date_range(
                "date_range",
                Some(String::from("2024-01-01")),
                Some(String::from("2024-06-30")),
            );

        let first = adapter.build_request(&filter);
        let second = adapter.build_request(&filter);

        assert!(
            first.is_some(),
            "{} should have a live backend",
            adapter.source_type()
        );
        assert_eq!(
            first, second,
            "{} request construction should be deterministic",
            adapter.source_type()
        );
    }
}

#[test]
fn live_adapters_identify_themselves_and_bound_page_size() {
    for adapter in live_adapters() {
        let request = adapter
            .build_request(&SourceFilter::new(adapter.source_type()))
            .unwrap_or_else(|| panic!("{} should build a request", adapter.source_type()));

        let user_agent = request
            .headers
            .get("user-agent")
            .unwrap_or_else(|| panic!("{} should send a User-Agent", adapter.source_type()));
        assert!(
            user_agent.starts_with("RegIQ/"),
            "{} sends a descriptive User-Agent, got {user_agent}",
            adapter.source_type()
        );

        assert!(
            request.url.contains("50"),
            "{} should cap results at the fixed page size, url {}",
            adapter.source_type(),
            request.url
        );
    }
}

#[test]
fn live_adapters_encode_query_values_in_urls() {
    let adapter = UsdaAdapter::default();
    let filter = SourceFilter::new(SourceType::Usda).with_text("query", "ground beef");

    let request = adapter
        .build_request(&filter)
        .expect("usda builds a request");

    assert!(
        !request.url.contains("ground beef"),
        "raw spaces must not reach the URL: {}",
        request.url
    );
    assert!(request.url.contains("ground%20beef"));
}

#[test]
fn normalize_tolerates_empty_and_malformed_payloads() {
    let payloads = vec![
        json!({}),
        json!(null),
        json!([1, 2, 3]),
        json!("not an object"),
        json!({"results": "not an array"}),
        json!({"recalls": 42}),
    ];

    for adapter in live_adapters() {
        for payload in &payloads {
            let alerts = adapter.normalize(payload);
            assert!(
                alerts.is_empty(),
                "{} should yield no alerts for {payload}",
                adapter.source_type()
            );
        }
    }
}

#[test]
fn normalize_fills_defaults_for_sparse_items() {
    let adapter = FdaAdapter::default();
    // Items with no usable fields still map, with synthesized identifiers.
    let payload = json!({"results": [{}, {"product_description": "Cheese"}]});

    let alerts = adapter.normalize(&payload);

    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].external_id, "item-0");
    assert!(alerts[0].id.starts_with("FDA-"));
}

#[test]
fn placeholder_adapters_stay_offline() {
    for source in SourceType::ALL {
        if source.is_live() {
            continue;
        }

        let adapter = PlaceholderAdapter::new(source);
        let filter = SourceFilter::new(source).with_text("query", "anything");

        assert!(adapter.build_request(&filter).is_none());
        assert!(adapter.normalize(&json!({"results": [{}]})).is_empty());
    }
}

#[test]
fn adapter_policies_declare_positive_budgets() {
    for source in SourceType::ALL {
        let config = regiq_core::AdapterConfig::default_for(source);
        assert!(config.rate_limit.requests_per_hour > 0);
        assert!(config.retry.max_attempts > 0);
        assert!(config.circuit_breaker.failure_threshold > 0);
    }
}
