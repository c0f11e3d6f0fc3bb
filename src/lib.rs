//! Well-being Analytics - Compute engine for personal self-tracking logs
//!
//! Turns an in-memory check-in log (mood, energy, stress, hydration, work time, ...)
//! into the derived statistics a dashboard renders: categorical mapping →
//! correlation ranking → daily resampling → rolling trend with a fitted line →
//! streaks, milestones and period summaries.
//!
//! Missing values are `Option::None` throughout and are never coerced to zero.
//! Every computation is a pure function of the dataset it is given.

pub mod breakdown;
pub mod config;
pub mod correlation;
pub mod error;
pub mod generator;
pub mod mapping;
pub mod pipeline;
pub mod resample;
pub mod summary;
pub mod trend;
pub mod types;

pub use config::AnalyticsConfig;
pub use correlation::{correlate, CORE_METRICS};
pub use error::AnalyticsError;
pub use generator::generate;
pub use mapping::{map_categorical, CategoricalScale, MOOD_SCALE};
pub use pipeline::{correlations_json, summary_json, trend_json, AnalyticsProcessor};
pub use resample::daily_average;
pub use summary::{summary, PeriodSlice};
pub use trend::trend;
pub use types::{Column, ColumnKind, Dataset, Entry, Value};

/// Engine version embedded in CLI output
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for CLI output
pub const PRODUCER_NAME: &str = "wellbeing-analytics";
