use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::SourceType;

/// Typed filter value accepted by adapters.
///
/// Adapters read the keys they understand and silently skip everything else;
/// an unknown key is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    /// Free-text value (search query, state code, classification, ...).
    Text(String),
    /// Set of discrete terms ORed together by the adapter.
    Terms(Vec<String>),
    /// Inclusive date range; bounds are ISO-8601 calendar dates.
    DateRange {
        min: Option<String>,
        max: Option<String>,
    },
}

/// Query object callers hand to the registry: which source to ask, and what
/// to ask it for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFilter {
    pub source: SourceType,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, FilterValue>,
}

impl SourceFilter {
    pub fn new(source: SourceType) -> Self {
        Self {
            source,
            filters: BTreeMap::new(),
        }
    }

    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters
            .insert(key.into(), FilterValue::Text(value.into()));
        self
    }

    pub fn with_terms(mut self, key: impl Into<String>, terms: Vec<String>) -> Self {
        self.filters.insert(key.into(), FilterValue::Terms(terms));
        self
    }

    pub fn with_date_range(
        mut self,
        key: impl Into<String>,
        min: Option<String>,
        max: Option<String>,
    ) -> Self {
        self.filters
            .insert(key.into(), FilterValue::DateRange { min, max });
        self
    }

    /// Text value for `key`, when present and of text shape.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.filters.get(key) {
            Some(FilterValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn terms(&self, key: &str) -> Option<&[String]> {
        match self.filters.get(key) {
            Some(FilterValue::Terms(terms)) => Some(terms.as_slice()),
            _ => None,
        }
    }

    pub fn date_range(&self, key: &str) -> Option<(Option<&str>, Option<&str>)> {
        match self.filters.get(key) {
            Some(FilterValue::DateRange { min, max }) => {
                Some((min.as_deref(), max.as_deref()))
            }
            _ => None,
        }
    }
}
