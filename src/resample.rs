//! Daily resampling
//!
//! Collapses multi-entry-per-day logs into one mean per calendar day over a
//! continuous date range, plus the window helpers that operate on those series:
//! - Daily average with explicit gaps for untracked days
//! - Trailing rolling mean with a minimum observation count
//! - Forward fill

use crate::error::AnalyticsError;
use crate::types::{DailySeries, Dataset};
use std::collections::BTreeMap;

/// Daily mean of each requested numeric metric over [min(date), max(date)]
pub fn daily_average(
    dataset: &Dataset,
    metrics: &[&str],
) -> Result<BTreeMap<String, DailySeries>, AnalyticsError> {
    let mut out = BTreeMap::new();
    for metric in metrics {
        out.insert(metric.to_string(), daily_series(dataset, metric)?);
    }
    Ok(out)
}

/// Daily mean of a single numeric metric
pub fn daily_series(dataset: &Dataset, metric: &str) -> Result<DailySeries, AnalyticsError> {
    let values = dataset.numeric_column(metric)?;

    let (start, end) = match (dataset.min_date(), dataset.max_date()) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(AnalyticsError::EmptyDataset(format!(
                "cannot resample '{metric}' without entries"
            )))
        }
    };

    let days = (end - start).num_days() as usize + 1;
    let mut sums = vec![0.0; days];
    let mut counts = vec![0usize; days];

    for (entry, value) in dataset.entries().iter().zip(values) {
        if let Some(v) = value {
            let idx = (entry.date() - start).num_days() as usize;
            sums[idx] += v;
            counts[idx] += 1;
        }
    }

    let values = sums
        .into_iter()
        .zip(counts)
        .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
        .collect();

    log::debug!("resampled '{metric}' onto {days} days from {start} to {end}");

    Ok(DailySeries { start, values })
}

/// Trailing rolling mean over `window` slots
///
/// Each output slot averages the present values among itself and the previous
/// `window - 1` slots, and is `None` when fewer than `min_observations` are present.
pub fn rolling_mean(values: &[Option<f64>], window: usize, min_observations: usize) -> Vec<Option<f64>> {
    let min_observations = min_observations.max(1);
    (0..values.len())
        .map(|i| {
            let from = (i + 1).saturating_sub(window);
            let present: Vec<f64> = values[from..=i].iter().flatten().copied().collect();
            if present.len() < min_observations {
                None
            } else {
                Some(present.iter().sum::<f64>() / present.len() as f64)
            }
        })
        .collect()
}

/// Carry the last present value forward into gaps; leading gaps stay empty
pub fn forward_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    values
        .iter()
        .map(|v| {
            if v.is_some() {
                last = *v;
            }
            last
        })
        .collect()
}
