//! History and time breakdown
//!
//! Period-restricted views used by the dashboard's history chart and the
//! per-category split of logged hours.

use chrono::Duration;
use std::collections::BTreeMap;

use crate::error::AnalyticsError;
use crate::resample::daily_average;
use crate::summary::PeriodSlice;
use crate::types::{
    CategoryHours, DailySeries, Dataset, TimeBreakdown, COGNITIVE_CLARITY, MOOD, PHYSICAL_ENERGY,
    STRESS, TIME_CATEGORY, WORK_HOURS,
};

/// Metrics shown on the history chart
pub const DEFAULT_HISTORY_METRICS: [&str; 4] = [PHYSICAL_ENERGY, COGNITIVE_CLARITY, MOOD, STRESS];

/// Labels offered for `time_category`
pub const TIME_CATEGORIES: [&str; 6] = ["Work", "Family", "Hobby", "Exercise", "Social", "Rest"];

/// Daily averages of `metrics` (categories mapped) over the last `period_days`
pub fn history(
    dataset: &Dataset,
    metrics: &[&str],
    period_days: u32,
) -> Result<BTreeMap<String, DailySeries>, AnalyticsError> {
    let start = dataset
        .window_start(Duration::days(i64::from(period_days)))
        .ok_or_else(|| {
            AnalyticsError::EmptyDataset("cannot build history without entries".to_string())
        })?;

    daily_average(&dataset.with_scaled_categories().since(start), metrics)
}

/// Hours logged in the last `period_days`, summed per `time_category`
///
/// Entries missing the category or the hours are skipped.
pub fn time_breakdown(dataset: &Dataset, period_days: u32) -> Result<TimeBreakdown, AnalyticsError> {
    let slice = PeriodSlice::last_days(dataset, period_days)?;

    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    let mut skipped = 0usize;

    for entry in slice.entries() {
        match (entry.text(TIME_CATEGORY), entry.number(WORK_HOURS)) {
            (Some(category), Some(hours)) => *totals.entry(category).or_insert(0.0) += hours,
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("time breakdown skipped {skipped} entries without category or hours");
    }

    Ok(TimeBreakdown {
        period_start: slice.start(),
        period_end: slice.end(),
        total_hours: totals.values().sum(),
        breakdown: totals
            .into_iter()
            .map(|(category, hours)| CategoryHours {
                category: category.to_string(),
                hours,
            })
            .collect(),
    })
}
