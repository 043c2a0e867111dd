use serde_json::Value;

use crate::adapter::SourceAdapter;
use crate::http_client::HttpRequest;
use crate::policy::AdapterConfig;
use crate::{Alert, SourceFilter, SourceType};

/// Stub adapter for declared-but-unimplemented sources.
///
/// Every query against a placeholder resolves to an empty success without any
/// network traffic, so callers can enumerate and poll the full source matrix
/// before a real backend is wired up.
pub struct PlaceholderAdapter {
    source: SourceType,
    config: AdapterConfig,
}

impl PlaceholderAdapter {
    pub fn new(source: SourceType) -> Self {
        Self {
            source,
            config: AdapterConfig::placeholder_default(),
        }
    }

    pub fn with_config(source: SourceType, config: AdapterConfig) -> Self {
        Self { source, config }
    }
}

impl SourceAdapter for PlaceholderAdapter {
    fn source_type(&self) -> SourceType {
        self.source
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn build_request(&self, _filter: &SourceFilter) -> Option<HttpRequest> {
        None
    }

    fn normalize(&self, _payload: &Value) -> Vec<Alert> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn placeholders_build_no_request_and_normalize_nothing() {
        let adapter = PlaceholderAdapter::new(SourceType::RegulationsGov);
        assert_eq!(adapter.source_type(), SourceType::RegulationsGov);
        assert!(adapter
            .build_request(&SourceFilter::new(SourceType::RegulationsGov))
            .is_none());
        assert!(adapter.normalize(&json!({"results": [{"id": 1}]})).is_empty());
    }
}
