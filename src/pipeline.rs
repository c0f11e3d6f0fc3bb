//! Pipeline orchestration
//!
//! This module provides the public API for the analytics engine.
//! It wires configuration into each computation and offers JSON-in/JSON-out
//! helpers for callers that hold the log as serialized text.

use std::collections::BTreeMap;

use crate::breakdown::{history, time_breakdown, DEFAULT_HISTORY_METRICS};
use crate::config::AnalyticsConfig;
use crate::correlation::correlate;
use crate::error::AnalyticsError;
use crate::summary::summary_with_config;
use crate::trend::trend;
use crate::types::{
    CorrelationReport, DailySeries, Dataset, SummaryMetrics, TimeBreakdown, TrendReport,
};

/// Rank correlations against `target_metric` for a dataset given as JSON.
///
/// # Arguments
/// * `dataset_json` - Serialized `Dataset`
/// * `target_metric` - Column to correlate against (e.g. "physical_energy")
///
/// # Returns
/// Serialized `CorrelationReport`
///
/// # Example
/// ```ignore
/// let report = correlations_json(dataset_json, "mood".to_string())?;
/// ```
pub fn correlations_json(
    dataset_json: String,
    target_metric: String,
) -> Result<String, AnalyticsError> {
    let dataset = Dataset::from_json(&dataset_json)?;
    let report = AnalyticsProcessor::new().correlate(&dataset, &target_metric)?;
    Ok(serde_json::to_string(&report)?)
}

/// Estimate the recent trend of `metric` for a dataset given as JSON.
///
/// Uses the default 7-day rolling window and 8-week lookback.
pub fn trend_json(dataset_json: String, metric: String) -> Result<String, AnalyticsError> {
    let dataset = Dataset::from_json(&dataset_json)?;
    let report = AnalyticsProcessor::new().trend(&dataset, &metric)?;
    Ok(serde_json::to_string(&report)?)
}

/// Summary metrics over the last `period_days` for a dataset given as JSON.
pub fn summary_json(dataset_json: String, period_days: u32) -> Result<String, AnalyticsError> {
    let dataset = Dataset::from_json(&dataset_json)?;
    let processor = AnalyticsProcessor::with_config(AnalyticsConfig {
        period_days,
        ..Default::default()
    })?;
    Ok(serde_json::to_string(&processor.summary(&dataset)?)?)
}

/// Configured entry point for every analytics computation.
///
/// Holds no per-dataset state: each call works on the dataset it is given.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsProcessor {
    config: AnalyticsConfig,
}

impl AnalyticsProcessor {
    /// Create a processor with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with validated settings
    pub fn with_config(config: AnalyticsConfig) -> Result<Self, AnalyticsError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Load settings from JSON
    pub fn load_config(&mut self, json: &str) -> Result<(), AnalyticsError> {
        self.config = AnalyticsConfig::from_json(json)?;
        Ok(())
    }

    /// Save settings to JSON
    pub fn save_config(&self) -> Result<String, AnalyticsError> {
        self.config.to_json()
    }

    /// Ranked correlations plus the core metric matrix
    pub fn correlate(
        &self,
        dataset: &Dataset,
        target_metric: &str,
    ) -> Result<CorrelationReport, AnalyticsError> {
        correlate(dataset, target_metric)
    }

    /// Rolling trend and fitted direction of `metric`
    pub fn trend(&self, dataset: &Dataset, metric: &str) -> Result<TrendReport, AnalyticsError> {
        trend(
            dataset,
            metric,
            self.config.window_days,
            self.config.lookback_weeks,
        )
    }

    /// Achievements, streaks and milestones
    pub fn summary(&self, dataset: &Dataset) -> Result<SummaryMetrics, AnalyticsError> {
        summary_with_config(dataset, &self.config)
    }

    /// Daily series of `metrics` over the summary period; defaults to the
    /// history chart metrics when `metrics` is empty
    pub fn history(
        &self,
        dataset: &Dataset,
        metrics: &[&str],
    ) -> Result<BTreeMap<String, DailySeries>, AnalyticsError> {
        let metrics = if metrics.is_empty() {
            &DEFAULT_HISTORY_METRICS[..]
        } else {
            metrics
        };
        history(dataset, metrics, self.config.period_days)
    }

    /// Logged hours by time category over the summary period
    pub fn time_breakdown(&self, dataset: &Dataset) -> Result<TimeBreakdown, AnalyticsError> {
        time_breakdown(dataset, self.config.period_days)
    }
}
