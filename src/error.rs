//! Error types for the well-being analytics engine

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during computation
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Invalid metric '{metric}': {reason}")]
    InvalidMetric { metric: String, reason: String },

    #[error("Insufficient data for '{metric}' between {start} and {end}: no daily observations")]
    InsufficientData {
        metric: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Division undefined: {0}")]
    DivisionUndefined(String),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalyticsError {
    pub(crate) fn invalid_metric(metric: &str, reason: impl Into<String>) -> Self {
        AnalyticsError::InvalidMetric {
            metric: metric.to_string(),
            reason: reason.into(),
        }
    }
}
