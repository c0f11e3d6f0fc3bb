//! Engine configuration
//!
//! Window sizes, lookbacks and achievement thresholds used by the processor.
//! Every field has a dashboard default and can be overridden from JSON.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::summary::{
    DEFAULT_HAPPY_MILESTONE_COUNT, DEFAULT_HIGH_ENERGY_THRESHOLD, DEFAULT_HYDRATION_STREAK_DAYS,
    DEFAULT_HYDRATION_THRESHOLD, DEFAULT_PERIOD_DAYS,
};
use crate::trend::{DEFAULT_LOOKBACK_WEEKS, DEFAULT_WINDOW_DAYS};

/// Analytics engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Trailing rolling window for trends (days)
    pub window_days: usize,
    /// Trend lookback (weeks)
    pub lookback_weeks: u32,
    /// Summary period (days)
    pub period_days: u32,
    /// Physical energy counted as a high-energy check-in
    pub high_energy_threshold: f64,
    /// Daily hydration needed for the hydration milestone
    pub hydration_threshold: f64,
    /// Consecutive days of hydration needed for the milestone
    pub hydration_streak_days: usize,
    /// Happy moments needed for the cumulative milestone
    pub happy_milestone_count: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            lookback_weeks: DEFAULT_LOOKBACK_WEEKS,
            period_days: DEFAULT_PERIOD_DAYS,
            high_energy_threshold: DEFAULT_HIGH_ENERGY_THRESHOLD,
            hydration_threshold: DEFAULT_HYDRATION_THRESHOLD,
            hydration_streak_days: DEFAULT_HYDRATION_STREAK_DAYS,
            happy_milestone_count: DEFAULT_HAPPY_MILESTONE_COUNT,
        }
    }
}

impl AnalyticsConfig {
    /// Check that windows and milestone counts are non-empty
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.window_days == 0 {
            return Err(AnalyticsError::InvalidConfig(
                "window_days must be at least 1".to_string(),
            ));
        }
        if self.hydration_streak_days == 0 {
            return Err(AnalyticsError::InvalidConfig(
                "hydration_streak_days must be at least 1".to_string(),
            ));
        }
        if self.happy_milestone_count == 0 {
            return Err(AnalyticsError::InvalidConfig(
                "happy_milestone_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, AnalyticsError> {
        let config: AnalyticsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON
    pub fn to_json(&self) -> Result<String, AnalyticsError> {
        Ok(serde_json::to_string(self)?)
    }
}
