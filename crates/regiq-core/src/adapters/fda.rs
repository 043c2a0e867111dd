use serde::Deserialize;
use serde_json::Value;

use super::{normalize_date, compact_date, PAGE_SIZE, USER_AGENT};
use crate::adapter::SourceAdapter;
use crate::http_client::HttpRequest;
use crate::policy::AdapterConfig;
use crate::{Alert, SourceFilter, SourceType, Urgency};

const ENFORCEMENT_URL: &str = "https://api.fda.gov/food/enforcement.json";
const RECALL_LISTING_URL: &str =
    "https://www.fda.gov/safety/recalls-market-withdrawals-safety-alerts";

/// openFDA food-enforcement adapter.
///
/// Requests use the openFDA Lucene-style `search=` expression: each
/// recognized filter becomes a clause and clauses are ANDed together.
pub struct FdaAdapter {
    config: AdapterConfig,
}

impl Default for FdaAdapter {
    fn default() -> Self {
        Self {
            config: AdapterConfig::fda_default(),
        }
    }
}

impl FdaAdapter {
    pub fn with_config(config: AdapterConfig) -> Self {
        Self { config }
    }

    fn search_expression(filter: &SourceFilter) -> Vec<String> {
        let mut clauses = Vec::new();

        if let Some(query) = filter.text("query") {
            clauses.push(format!("product_description:\"{query}\""));
        }

        if let Some(terms) = filter.terms("keywords") {
            let joined = terms
                .iter()
                .map(|term| format!("product_description:\"{term}\""))
                .collect::<Vec<_>>()
                .join(" OR ");
            if !joined.is_empty() {
                clauses.push(format!("({joined})"));
            }
        }

        if let Some(classification) = filter.text("classification") {
            clauses.push(format!("classification:\"{classification}\""));
        }

        if let Some(state) = filter.text("state") {
            clauses.push(format!("state:\"{state}\""));
        }

        if let Some((min, max)) = filter.date_range("date_range") {
            // openFDA ranges need both bounds; unspecified ends get fixed
            // sentinels so the request stays deterministic.
            let min = min.map(compact_date).unwrap_or_else(|| String::from("19700101"));
            let max = max.map(compact_date).unwrap_or_else(|| String::from("21001231"));
            clauses.push(format!("report_date:[{min} TO {max}]"));
        }

        clauses
    }
}

impl SourceAdapter for FdaAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::Fda
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn build_request(&self, filter: &SourceFilter) -> Option<HttpRequest> {
        let mut request = HttpRequest::get(ENFORCEMENT_URL)
            .with_header("accept", "application/json")
            .with_header("user-agent", USER_AGENT);

        let clauses = Self::search_expression(filter);
        if !clauses.is_empty() {
            request = request.with_query_param("search", &clauses.join(" AND "));
        }
        request = request.with_query_param("limit", &PAGE_SIZE.to_string());

        Some(request)
    }

    fn normalize(&self, payload: &Value) -> Vec<Alert> {
        let Some(results) = payload.get("results").and_then(Value::as_array) else {
            return Vec::new();
        };

        results
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let item: FdaEnforcementItem =
                    serde_json::from_value(raw.clone()).unwrap_or_default();

                let external_id = item
                    .recall_number
                    .clone()
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| format!("item-{index}"));

                let mut alert = Alert::new(SourceType::Fda, external_id)
                    .with_title(item.product_description.clone().unwrap_or_default())
                    .with_summary(item.reason_for_recall.clone().unwrap_or_default())
                    .with_urgency(classify(item.classification.as_deref()))
                    .with_external_url(RECALL_LISTING_URL);

                if let Some(date) = item
                    .report_date
                    .as_deref()
                    .and_then(normalize_date)
                {
                    alert = alert.with_published_date(date);
                }

                for (key, value) in [
                    ("classification", item.classification),
                    ("recalling_firm", item.recalling_firm),
                    ("status", item.status),
                    ("distribution_pattern", item.distribution_pattern),
                    ("state", item.state),
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

/// Urgency from the FDA recall classification.
///
/// Matched longest-first: "Class II" and "Class III" both contain "Class I"
/// as a substring.
fn classify(classification: Option<&str>) -> Urgency {
    let Some(classification) = classification else {
        return Urgency::Medium;
    };

    if classification.contains("Class III") {
        Urgency::Medium
    } else if classification.contains("Class II") {
        Urgency::High
    } else if classification.contains("Class I") {
        Urgency::Critical
    } else {
        Urgency::Medium
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FdaEnforcementItem {
    recall_number: Option<String>,
    classification: Option<String>,
    product_description: Option<String>,
    reason_for_recall: Option<String>,
    report_date: Option<String>,
    recalling_firm: Option<String>,
    status: Option<String>,
    distribution_pattern: Option<String>,
    state: Option<String>,
}
