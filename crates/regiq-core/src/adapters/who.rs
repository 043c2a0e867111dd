use serde::Deserialize;
use serde_json::Value;

use super::{normalize_date, PAGE_SIZE, USER_AGENT};
use crate::adapter::SourceAdapter;
use crate::http_client::HttpRequest;
use crate::policy::AdapterConfig;
use crate::{Alert, SourceFilter, SourceType, Urgency};

const OUTBREAK_NEWS_URL: &str = "https://www.who.int/api/emergencies/diseaseoutbreaknews";

/// WHO disease-outbreak-news adapter.
pub struct WhoAdapter {
    config: AdapterConfig,
}

impl Default for WhoAdapter {
    fn default() -> Self {
        Self {
            config: AdapterConfig::who_default(),
        }
    }
}

impl WhoAdapter {
    pub fn with_config(config: AdapterConfig) -> Self {
        Self { config }
    }
}

impl SourceAdapter for WhoAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::Who
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn build_request(&self, filter: &SourceFilter) -> Option<HttpRequest> {
        let mut request = HttpRequest::get(OUTBREAK_NEWS_URL)
            .with_header("accept", "application/json")
            .with_header("user-agent", USER_AGENT);

        if let Some(query) = filter.text("query") {
            request = request.with_query_param("q", query);
        }
        if let Some(terms) = filter.terms("diseases") {
            if !terms.is_empty() {
                request = request.with_query_param("diseases", &terms.join(","));
            }
        }
        if let Some((min, max)) = filter.date_range("date_range") {
            if let Some(min) = min {
                request = request.with_query_param("published_after", min);
            }
            if let Some(max) = max {
                request = request.with_query_param("published_before", max);
            }
        }
        request = request.with_query_param("limit", &PAGE_SIZE.to_string());

        Some(request)
    }

    fn normalize(&self, payload: &Value) -> Vec<Alert> {
        // The feed exposes either `alerts` or `outbreaks` depending on the
        // endpoint revision.
        let items = payload
            .get("alerts")
            .or_else(|| payload.get("outbreaks"))
            .and_then(Value::as_array);
        let Some(items) = items else {
            return Vec::new();
        };

        items
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let item: WhoOutbreakItem =
                    serde_json::from_value(raw.clone()).unwrap_or_default();

                let external_id = item
                    .id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| format!("item-{index}"));

                let level = item
                    .risk_assessment
                    .as_ref()
                    .and_then(|assessment| assessment.level.as_deref());

                let mut alert = Alert::new(SourceType::Who, external_id)
                    .with_title(item.title.clone().unwrap_or_default())
                    .with_summary(item.summary.clone().unwrap_or_default())
                    .with_urgency(classify(level))
                    .with_external_url(
                        item.url.clone().unwrap_or_else(|| String::from(OUTBREAK_NEWS_URL)),
                    );

                if let Some(date) = item.date_published.as_deref().and_then(normalize_date) {
                    alert = alert.with_published_date(date);
                }

                if let Some(level) = level {
                    alert = alert
                        .with_metadata_field("risk_level", Value::String(level.to_owned()));
                }
                if let Some(disease) = item.disease {
                    alert = alert.with_metadata_field("disease", Value::String(disease));
                }
                if let Some(region) = item.region {
                    alert = alert.with_metadata_field("region", Value::String(region));
                }

                alert
            })
            .collect()
    }
}

/// Urgency from the nested risk-assessment level.
///
/// "very high" contains "high", so the critical band is checked first on the
/// lowercased string.
fn classify(level: Option<&str>) -> Urgency {
    let Some(level) = level else {
        return Urgency::Medium;
    };
    let level = level.to_ascii_lowercase();

    if level.contains("very high") || level.contains("emergency") {
        Urgency::Critical
    } else if level.contains("high") {
        Urgency::High
    } else if level.contains("low") {
        Urgency::Low
    } else {
        Urgency::Medium
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WhoOutbreakItem {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    risk_assessment: Option<WhoRiskAssessment>,
    date_published: Option<String>,
    url: Option<String>,
    disease: Option<String>,
    region: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WhoRiskAssessment {
    level: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn risk_table_checks_the_critical_band_first() {
        assert_eq!(classify(Some("Very high")), Urgency::Critical);
        assert_eq!(classify(Some("Public health emergency")), Urgency::Critical);
        assert_eq!(classify(Some("High")), Urgency::High);
        assert_eq!(classify(Some("Low")), Urgency::Low);
        assert_eq!(classify(Some("Moderate")), Urgency::Medium);
        assert_eq!(classify(None), Urgency::Medium);
    }

    #[test]
    fn normalize_accepts_alerts_and_outbreaks_keys() {
        let adapter = WhoAdapter::default();
        let item = json!({
            "id": "DON-512",
            "title": "Cholera - Region A",
            "risk_assessment": { "level": "Very high" }
        });

        let from_alerts = adapter.normalize(&json!({ "alerts": [item] }));
        let from_outbreaks = adapter.normalize(&json!({ "outbreaks": [item] }));
        assert_eq!(from_alerts.len(), 1);
        assert_eq!(from_outbreaks.len(), 1);
        assert_eq!(from_alerts[0].id, "WHO-DON-512");
        assert_eq!(from_alerts[0].urgency, Urgency::Critical);
    }

    #[test]
    fn normalize_of_empty_payload_is_empty() {
        let adapter = WhoAdapter::default();
        assert!(adapter.normalize(&json!({})).is_empty());
        assert!(adapter.normalize(&json!({"alerts": null})).is_empty());
    }

    #[test]
    fn disease_terms_join_into_one_parameter() {
        let adapter = WhoAdapter::default();
        let filter = SourceFilter::new(SourceType::Who).with_terms(
            "diseases",
            vec![String::from("cholera"), String::from("measles")],
        );

        let request = adapter.build_request(&filter).expect("who is live");
        assert!(request.url.contains("diseases=cholera%2Cmeasles"));
    }
}
