use serde::Deserialize;
use serde_json::Value;

use super::{normalize_date, PAGE_SIZE, USER_AGENT};
use crate::adapter::SourceAdapter;
use crate::http_client::HttpRequest;
use crate::policy::AdapterConfig;
use crate::{Alert, SourceFilter, SourceType, Urgency};

const INSPECTIONS_URL: &str = "https://www.fsis.usda.gov/fsis/api/inspection/v/1";

/// FSIS inspection-results adapter.
pub struct FsisAdapter {
    config: AdapterConfig,
}

impl Default for FsisAdapter {
    fn default() -> Self {
        Self {
            config: AdapterConfig::fsis_default(),
        }
    }
}

impl FsisAdapter {
    pub fn with_config(config: AdapterConfig) -> Self {
        Self { config }
    }
}

impl SourceAdapter for FsisAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::Fsis
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn build_request(&self, filter: &SourceFilter) -> Option<HttpRequest> {
        let mut request = HttpRequest::get(INSPECTIONS_URL)
            .with_header("accept", "application/json")
            .with_header("user-agent", USER_AGENT);

        if let Some(query) = filter.text("query") {
            request = request.with_query_param("establishment", query);
        }
        if let Some(state) = filter.text("state") {
            request = request.with_query_param("state", state);
        }
        if let Some((min, max)) = filter.date_range("date_range") {
            if let Some(min) = min {
                request = request.with_query_param("start_date", min);
            }
            if let Some(max) = max {
                request = request.with_query_param("end_date", max);
            }
        }
        request = request.with_query_param("page_size", &PAGE_SIZE.to_string());

        Some(request)
    }

    fn normalize(&self, payload: &Value) -> Vec<Alert> {
        // The feed has served both key spellings over time.
        let results = payload
            .get("inspection_results")
            .or_else(|| payload.get("results"))
            .and_then(Value::as_array);
        let Some(results) = results else {
            return Vec::new();
        };

        results
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let item: FsisInspectionItem =
                    serde_json::from_value(raw.clone()).unwrap_or_default();

                let external_id = item
                    .inspection_id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| format!("item-{index}"));

                let title = match (&item.establishment_name, &item.violation_type) {
                    (Some(name), Some(violation)) => format!("{name}: {violation}"),
                    (Some(name), None) => name.clone(),
                    (None, Some(violation)) => violation.clone(),
                    (None, None) => String::new(),
                };

                let mut alert = Alert::new(SourceType::Fsis, external_id)
                    .with_title(title)
                    .with_summary(item.description.clone().unwrap_or_default())
                    .with_urgency(classify(item.violation_type.as_deref()))
                    .with_external_url(INSPECTIONS_URL);

                if let Some(date) = item.inspection_date.as_deref().and_then(normalize_date) {
                    alert = alert.with_published_date(date);
                }

                for (key, value) in [
                    ("violation_type", item.violation_type),
                    ("establishment_name", item.establishment_name),
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

/// Urgency from the violation type, case-insensitive substring match.
fn classify(violation_type: Option<&str>) -> Urgency {
    let Some(violation_type) = violation_type else {
        return Urgency::Medium;
    };
    let violation = violation_type.to_ascii_lowercase();

    if violation.contains("critical") || violation.contains("imminent") {
        Urgency::Critical
    } else if violation.contains("serious") || violation.contains("major") {
        Urgency::High
    } else if violation.contains("minor") {
        Urgency::Low
    } else {
        Urgency::Medium
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FsisInspectionItem {
    inspection_id: Option<String>,
    establishment_name: Option<String>,
    violation_type: Option<String>,
    description: Option<String>,
    inspection_date: Option<String>,
    state: Option<String>,
}
