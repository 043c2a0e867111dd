use serde::Deserialize;
use serde_json::Value;

use super::{normalize_date, PAGE_SIZE, USER_AGENT};
use crate::adapter::SourceAdapter;
use crate::http_client::HttpRequest;
use crate::policy::AdapterConfig;
use crate::{Alert, SourceFilter, SourceType, Urgency};

const RECALLS_URL: &str = "https://www.fsis.usda.gov/fsis/api/recalls/v/1";

/// USDA recall-feed adapter. Filters become discrete query parameters.
pub struct UsdaAdapter {
    config: AdapterConfig,
}

impl Default for UsdaAdapter {
    fn default() -> Self {
        Self {
            config: AdapterConfig::usda_default(),
        }
    }
}

impl UsdaAdapter {
    pub fn with_config(config: AdapterConfig) -> Self {
        Self { config }
    }
}

impl SourceAdapter for UsdaAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::Usda
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn build_request(&self, filter: &SourceFilter) -> Option<HttpRequest> {
        let mut request = HttpRequest::get(RECALLS_URL)
            .with_header("accept", "application/json")
            .with_header("user-agent", USER_AGENT);

        if let Some(query) = filter.text("query") {
            request = request.with_query_param("product", query);
        }
        if let Some(state) = filter.text("state") {
            request = request.with_query_param("state", state);
        }
        if let Some((min, max)) = filter.date_range("date_range") {
            if let Some(min) = min {
                request = request.with_query_param("from_date", min);
            }
            if let Some(max) = max {
                request = request.with_query_param("to_date", max);
            }
        }
        request = request.with_query_param("limit", &PAGE_SIZE.to_string());

        Some(request)
    }

    fn normalize(&self, payload: &Value) -> Vec<Alert> {
        let Some(recalls) = payload.get("recalls").and_then(Value::as_array) else {
            return Vec::new();
        };

        recalls
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let item: UsdaRecallItem =
                    serde_json::from_value(raw.clone()).unwrap_or_default();

                let external_id = item
                    .recall_case_number
                    .clone()
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| format!("item-{index}"));

                let mut alert = Alert::new(SourceType::Usda, external_id)
                    .with_title(item.product_name.clone().unwrap_or_default())
                    .with_summary(item.recall_reason.clone().unwrap_or_default())
                    .with_urgency(classify(item.health_hazard_evaluation.as_deref()))
                    .with_external_url(
                        item.press_release_url
                            .clone()
                            .unwrap_or_else(|| String::from(RECALLS_URL)),
                    );

                if let Some(date) = item.recall_date.as_deref().and_then(normalize_date) {
                    alert = alert.with_published_date(date);
                }

                for (key, value) in [
                    ("health_hazard_evaluation", item.health_hazard_evaluation),
                    ("company_name", item.company_name),
                    ("product_quantity", item.product_quantity),
                ] {
                    if let Some(value) = value {
                        alert = alert.with_metadata_field(key, Value::String(value));
                    }
                }

                alert
            })
            .collect()
    }
}

/// Urgency from the health-hazard evaluation text.
///
/// "high" is checked as part of the critical band first, so the comparison is
/// done on the lowercased string in band order.
fn classify(evaluation: Option<&str>) -> Urgency {
    let Some(evaluation) = evaluation else {
        return Urgency::Medium;
    };
    let evaluation = evaluation.to_ascii_lowercase();

    if evaluation.contains("high") || evaluation.contains("serious") {
        Urgency::Critical
    } else if evaluation.contains("moderate") {
        Urgency::High
    } else if evaluation.contains("low") {
        Urgency::Low
    } else {
        Urgency::Medium
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UsdaRecallItem {
    recall_case_number: Option<String>,
    product_name: Option<String>,
    health_hazard_evaluation: Option<String>,
    recall_reason: Option<String>,
    recall_date: Option<String>,
    company_name: Option<String>,
    product_quantity: Option<String>,
    press_release_url: Option<String>,
}
