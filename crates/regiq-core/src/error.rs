use thiserror::Error;

/// Validation errors exposed by `regiq-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid source '{value}', expected one of the declared source identifiers")]
    InvalidSource { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
}
