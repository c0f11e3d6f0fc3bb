//! Trend estimation
//!
//! Smooths a metric's recent daily averages with a trailing rolling mean and fits
//! a least-squares line through the smoothed series to summarise its direction.
//!
//! Pipeline: map categories → restrict to lookback → daily average → rolling mean
//! → forward fill → linear fit → direction and summary.

use chrono::Duration;

use crate::error::AnalyticsError;
use crate::mapping::scale_for;
use crate::resample::{daily_series, forward_fill, rolling_mean};
use crate::types::{ColumnKind, Dataset, TrendDirection, TrendReport};

/// Default rolling window in days
pub const DEFAULT_WINDOW_DAYS: usize = 7;

/// Default lookback in weeks
pub const DEFAULT_LOOKBACK_WEEKS: u32 = 8;

/// Estimate the recent trend of `metric`
///
/// # Arguments
/// * `dataset` - Check-in log
/// * `metric` - Numeric column, or a categorical column with a registered scale
/// * `window_days` - Trailing rolling window (partial windows allowed)
/// * `lookback_weeks` - How far back from the last log day to look
///
/// A fit with `change == 0.0` reports `Declined`; callers that need to tell a flat
/// trend apart should check `change` directly.
pub fn trend(
    dataset: &Dataset,
    metric: &str,
    window_days: usize,
    lookback_weeks: u32,
) -> Result<TrendReport, AnalyticsError> {
    if window_days == 0 {
        return Err(AnalyticsError::InvalidConfig(
            "window_days must be at least 1".to_string(),
        ));
    }

    let numeric = numeric_view(dataset, metric)?;

    let (boundary, end) = match (
        numeric.window_start(Duration::weeks(i64::from(lookback_weeks))),
        numeric.max_date(),
    ) {
        (Some(boundary), Some(end)) => (boundary, end),
        _ => {
            return Err(AnalyticsError::EmptyDataset(format!(
                "cannot compute trend of '{metric}' without entries"
            )))
        }
    };
    let recent = numeric.since(boundary);

    let daily = daily_series(&recent, metric)?;
    if daily.observed_days() == 0 {
        return Err(AnalyticsError::InsufficientData {
            metric: metric.to_string(),
            start: boundary,
            end,
        });
    }

    let rolling = rolling_mean(&daily.values, window_days, 1);
    let filled = forward_fill(&rolling);

    let points: Vec<(f64, f64)> = filled
        .iter()
        .enumerate()
        .filter_map(|(i, y)| y.map(|y| (i as f64, y)))
        .collect();
    let (slope, intercept) = linear_fit(&points);

    let n = daily.len();
    let fitted: Vec<f64> = (0..n).map(|i| intercept + slope * i as f64).collect();
    let change = fitted[n - 1] - fitted[0];

    let direction = if change > 0.0 {
        TrendDirection::Improved
    } else {
        TrendDirection::Declined
    };

    let label = metric_label(metric);
    let summary = format!(
        "{} has {} by {:.1} points over {} weeks",
        label,
        direction.as_str(),
        change.abs(),
        lookback_weeks
    );

    log::debug!(
        "trend of '{metric}' over {} days from {}: slope {slope:.4}, change {change:.4}",
        n,
        daily.start
    );

    Ok(TrendReport {
        metric: metric.to_string(),
        label,
        window_days,
        lookback_weeks,
        daily,
        rolling,
        fitted,
        slope,
        intercept,
        change,
        direction,
        summary,
    })
}

/// Dataset in which `metric` is numeric, mapping a scaled category if needed
fn numeric_view(dataset: &Dataset, metric: &str) -> Result<Dataset, AnalyticsError> {
    let column = dataset
        .column(metric)
        .ok_or_else(|| AnalyticsError::invalid_metric(metric, "no such column"))?;

    match column.kind {
        ColumnKind::Numeric => Ok(dataset.clone()),
        ColumnKind::Categorical => match scale_for(metric) {
            Some(scale) => dataset.with_mapped_column(metric, scale),
            None => Err(AnalyticsError::invalid_metric(
                metric,
                "categorical column has no numeric scale",
            )),
        },
        kind => Err(AnalyticsError::invalid_metric(
            metric,
            format!("cannot trend a {kind:?} column"),
        )),
    }
}

/// Ordinary least-squares line through `points`, returned as (slope, intercept)
///
/// A single point yields a flat line through it.
pub fn linear_fit(points: &[(f64, f64)]) -> (f64, f64) {
    let n = points.len() as f64;
    if points.is_empty() {
        return (0.0, 0.0);
    }

    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in points {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }

    if sxx == 0.0 {
        return (0.0, mean_y);
    }

    let slope = sxy / sxx;
    (slope, mean_y - slope * mean_x)
}

/// Display label for a column name, e.g. `physical_energy` → `Physical Energy`
pub fn metric_label(metric: &str) -> String {
    metric
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Entry, HAPPY_MOMENT, HYDRATION, MOOD, PHYSICAL_ENERGY};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    }

    fn daily_dataset(values: &[(i64, f64)]) -> Dataset {
        Dataset::with_standard_columns(
            values
                .iter()
                .map(|(offset, v)| Entry::on(day(*offset)).with(PHYSICAL_ENERGY, *v))
                .collect(),
        )
    }

    #[test]
    fn test_repeating_ramp_improves() {
        let values: Vec<(i64, f64)> = (0..30).map(|i| (i, (i % 7 + 1) as f64)).collect();
        let report = trend(&daily_dataset(&values), PHYSICAL_ENERGY, 7, 8).unwrap();

        assert_eq!(report.direction, TrendDirection::Improved);
        assert_eq!(report.daily.len(), 30);
        assert_eq!(report.rolling.len(), report.daily.len());
        assert_eq!(report.fitted.len(), report.daily.len());
        // First rolling value uses a 1-day window
        assert_eq!(report.rolling[0], Some(1.0));
        assert_eq!(report.rolling[6], Some(4.0));
        assert!((report.change - report.slope * 29.0).abs() < 1e-9);
        assert!(report.summary.starts_with("Physical Energy has improved by"));
    }

    #[test]
    fn test_forward_fill_before_fit() {
        let report = trend(&daily_dataset(&[(0, 2.0), (2, 4.0)]), PHYSICAL_ENERGY, 1, 8).unwrap();

        assert_eq!(report.daily.values, vec![Some(2.0), None, Some(4.0)]);
        assert_eq!(report.rolling, vec![Some(2.0), None, Some(4.0)]);
        assert!((report.slope - 1.0).abs() < 1e-12);
        assert!((report.change - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_declining_summary() {
        let report = trend(
            &daily_dataset(&[(0, 7.0), (1, 6.0), (2, 5.0), (3, 4.0)]),
            PHYSICAL_ENERGY,
            1,
            4,
        )
        .unwrap();

        assert_eq!(report.direction, TrendDirection::Declined);
        assert_eq!(
            report.summary,
            "Physical Energy has declined by 3.0 points over 4 weeks"
        );
    }

    #[test]
    fn test_flat_trend_counts_as_declined() {
        let report = trend(
            &daily_dataset(&[(0, 5.0), (1, 5.0), (2, 5.0)]),
            PHYSICAL_ENERGY,
            7,
            8,
        )
        .unwrap();

        assert_eq!(report.change, 0.0);
        assert_eq!(report.direction, TrendDirection::Declined);
    }

    #[test]
    fn test_single_observation_is_flat() {
        let report = trend(&daily_dataset(&[(0, 3.0)]), PHYSICAL_ENERGY, 7, 8).unwrap();

        assert_eq!(report.fitted, vec![3.0]);
        assert_eq!(report.direction, TrendDirection::Declined);
    }

    #[test]
    fn test_lookback_boundary_is_inclusive() {
        let report = trend(
            &daily_dataset(&[(0, 1.0), (44, 7.0), (100, 1.0)]),
            PHYSICAL_ENERGY,
            7,
            8,
        )
        .unwrap();

        // 100 - 56 = day 44 is the first day kept; day 0 is dropped
        assert_eq!(report.daily.start, day(44));
        assert_eq!(report.daily.len(), 57);
        assert_eq!(report.daily.values[0], Some(7.0));
        assert_eq!(report.direction, TrendDirection::Declined);
    }

    #[test]
    fn test_oversized_lookback_covers_whole_log() {
        let dataset = daily_dataset(&[(0, 1.0), (1, 2.0), (3, 4.0)]);

        let report = trend(&dataset, PHYSICAL_ENERGY, 7, 20_000_000).unwrap();

        assert_eq!(report.daily.start, day(0));
        assert_eq!(report.daily.len(), 4);
        assert_eq!(report.lookback_weeks, 20_000_000);
        assert_eq!(report.direction, TrendDirection::Improved);
    }

    #[test]
    fn test_mood_mapping_with_leading_gap() {
        let dataset = Dataset::with_standard_columns(vec![
            Entry::on(day(0)).with(MOOD, "Bewildered"),
            Entry::on(day(1)).with(MOOD, "Angry"),
            Entry::on(day(2)).with(MOOD, "Calm"),
            Entry::on(day(3)).with(MOOD, "Joyful"),
        ]);

        let report = trend(&dataset, MOOD, 1, 8).unwrap();

        assert_eq!(report.daily.values, vec![None, Some(1.0), Some(7.0), Some(10.0)]);
        assert_eq!(report.rolling[0], None);
        assert_eq!(report.fitted.len(), 4);
        assert_eq!(report.direction, TrendDirection::Improved);
        assert_eq!(report.label, "Mood");
    }

    #[test]
    fn test_errors() {
        let empty = Dataset::with_standard_columns(vec![]);
        assert!(matches!(
            trend(&empty, PHYSICAL_ENERGY, 7, 8),
            Err(AnalyticsError::EmptyDataset(_))
        ));

        let dataset = daily_dataset(&[(0, 1.0), (1, 2.0)]);
        assert!(matches!(
            trend(&dataset, HYDRATION, 7, 8),
            Err(AnalyticsError::InsufficientData { .. })
        ));
        assert!(matches!(
            trend(&dataset, "steps", 7, 8),
            Err(AnalyticsError::InvalidMetric { .. })
        ));
        assert!(matches!(
            trend(&dataset, HAPPY_MOMENT, 7, 8),
            Err(AnalyticsError::InvalidMetric { .. })
        ));
        assert!(matches!(
            trend(&dataset, PHYSICAL_ENERGY, 0, 8),
            Err(AnalyticsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_insufficient_data_reports_window() {
        let dataset = daily_dataset(&[(0, 1.0), (70, 2.0)]);
        let err = trend(&dataset, HYDRATION, 7, 8).unwrap_err();

        match err {
            AnalyticsError::InsufficientData { metric, start, end } => {
                assert_eq!(metric, HYDRATION);
                assert_eq!(start, day(14));
                assert_eq!(end, day(70));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_linear_fit() {
        let (slope, intercept) = linear_fit(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]);
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_metric_label() {
        assert_eq!(metric_label("physical_energy"), "Physical Energy");
        assert_eq!(metric_label("mood"), "Mood");
        assert_eq!(metric_label("sleep__quality"), "Sleep Quality");
    }
}
