use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{SourceType, UtcDateTime};

/// Four-level severity classification derived from source-specific signals.
///
/// Every normalized record carries exactly one of these values; adapters that
/// cannot classify an item fall back to [`Medium`](Self::Medium).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Urgency {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Urgency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl Display for Urgency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical normalized record produced by every adapter.
///
/// Instances are created fresh on each normalize call and never persisted by
/// the core; downstream collaborators own storage and deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Synthetic identifier, prefixed with the source (`"FDA-F-1234-2024"`).
    pub id: String,
    /// Identifier the upstream source assigned to the item.
    pub external_id: String,
    pub source: SourceType,
    pub title: String,
    pub summary: String,
    pub urgency: Urgency,
    /// ISO-8601 publication date, best-effort normalized from the raw item.
    pub published_date: String,
    pub external_url: String,
    /// Source-specific fields preserved verbatim for downstream consumers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl Alert {
    /// Builds an alert with defaults for everything the source did not
    /// provide; the publication date falls back to today.
    pub fn new(source: SourceType, external_id: impl Into<String>) -> Self {
        let external_id = external_id.into();
        Self {
            id: format!("{}-{}", source.as_str(), external_id),
            external_id,
            source,
            title: String::new(),
            summary: String::new(),
            urgency: Urgency::default(),
            published_date: UtcDateTime::now().format_date(),
            external_url: String::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_published_date(mut self, published_date: impl Into<String>) -> Self {
        self.published_date = published_date.into();
        self
    }

    pub fn with_external_url(mut self, external_url: impl Into<String>) -> Self {
        self.external_url = external_url.into();
        self
    }

    pub fn with_metadata_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
