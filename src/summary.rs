//! Streaks, milestones and period summaries
//!
//! Two scopes:
//! - `PeriodSlice` computations look only at the last `period_days` of the log
//!   (event counts, ratios, modes, threshold counts, the hydration milestone)
//! - `&Dataset` computations look at whatever log they are given (streaks,
//!   cumulative and sustained milestones); the summary hands them the whole log
//!   except for the hydration milestone

use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::resample::{daily_series, rolling_mean};
use crate::types::{
    Dataset, Entry, LabelCount, SummaryMetrics, HAPPY_MOMENT, HYDRATION, MOOD, PHYSICAL_ENERGY,
    USED_POMODORO, WORK_HOURS,
};

/// Default summary period in days
pub const DEFAULT_PERIOD_DAYS: u32 = 30;

/// Physical energy at or above this counts as a high-energy check-in
pub const DEFAULT_HIGH_ENERGY_THRESHOLD: f64 = 6.0;

/// Daily hydration at or above this counts toward the hydration milestone
pub const DEFAULT_HYDRATION_THRESHOLD: f64 = 7.0;

/// Consecutive days required for the hydration milestone
pub const DEFAULT_HYDRATION_STREAK_DAYS: usize = 7;

/// Happy moments required for the cumulative milestone
pub const DEFAULT_HAPPY_MILESTONE_COUNT: usize = 50;

/// Entries falling inside a calendar window of a dataset
#[derive(Debug, Clone)]
pub struct PeriodSlice<'a> {
    start: NaiveDate,
    end: NaiveDate,
    entries: Vec<&'a Entry>,
}

impl<'a> PeriodSlice<'a> {
    /// Entries dated within [start, end]
    pub fn new(dataset: &'a Dataset, start: NaiveDate, end: NaiveDate) -> Self {
        let entries = dataset
            .entries()
            .iter()
            .filter(|e| e.date() >= start && e.date() <= end)
            .collect();
        Self {
            start,
            end,
            entries,
        }
    }

    /// Entries dated on or after `max(date) - period_days`
    ///
    /// A period longer than the calendar allows covers the whole log.
    pub fn last_days(dataset: &'a Dataset, period_days: u32) -> Result<Self, AnalyticsError> {
        let (start, end) = match (
            dataset.window_start(Duration::days(i64::from(period_days))),
            dataset.max_date(),
        ) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(AnalyticsError::EmptyDataset(
                    "cannot slice a period out of an empty log".to_string(),
                ))
            }
        };
        Ok(Self::new(dataset, start, end))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn entries(&self) -> &[&'a Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Count entries where the text `field` is present
pub fn event_count(slice: &PeriodSlice<'_>, field: &str) -> usize {
    slice
        .entries()
        .iter()
        .filter(|e| e.text(field).is_some())
        .count()
}

/// Percentage of entries where the flag `field` is true
pub fn flag_ratio_pct(slice: &PeriodSlice<'_>, field: &str) -> Result<f64, AnalyticsError> {
    if slice.is_empty() {
        return Err(AnalyticsError::DivisionUndefined(format!(
            "no entries between {} and {} to rate '{field}'",
            slice.start(),
            slice.end()
        )));
    }
    let flagged = slice
        .entries()
        .iter()
        .filter(|e| e.flag(field) == Some(true))
        .count();
    Ok(flagged as f64 / slice.len() as f64 * 100.0)
}

/// Latest date with the flag `field` set
pub fn latest_flag_date(slice: &PeriodSlice<'_>, field: &str) -> Option<NaiveDate> {
    slice
        .entries()
        .iter()
        .filter(|e| e.flag(field) == Some(true))
        .map(|e| e.date())
        .max()
}

/// Sum of `value_field` over flagged entries on `date`; `None` if nothing is logged
pub fn flagged_total_on(
    slice: &PeriodSlice<'_>,
    flag_field: &str,
    value_field: &str,
    date: NaiveDate,
) -> Option<f64> {
    let values: Vec<f64> = slice
        .entries()
        .iter()
        .filter(|e| e.date() == date && e.flag(flag_field) == Some(true))
        .filter_map(|e| e.number(value_field))
        .collect();
    (!values.is_empty()).then(|| values.iter().sum())
}

/// Count entries whose numeric `field` meets or exceeds `threshold`
pub fn threshold_count(slice: &PeriodSlice<'_>, field: &str, threshold: f64) -> usize {
    slice
        .entries()
        .iter()
        .filter(|e| e.number(field).is_some_and(|v| v >= threshold))
        .count()
}

/// Most frequent label of `field`; ties go to the label seen first
pub fn most_frequent(
    slice: &PeriodSlice<'_>,
    field: &str,
) -> Result<Option<LabelCount>, AnalyticsError> {
    if slice.is_empty() {
        return Err(AnalyticsError::EmptyDataset(format!(
            "no entries between {} and {} to find the most frequent '{field}'",
            slice.start(),
            slice.end()
        )));
    }

    let mut counts: Vec<LabelCount> = Vec::new();
    for label in slice.entries().iter().filter_map(|e| e.text(field)) {
        match counts.iter_mut().find(|c| c.label == label) {
            Some(existing) => existing.count += 1,
            None => counts.push(LabelCount {
                label: label.to_string(),
                count: 1,
            }),
        }
    }

    let mut best: Option<LabelCount> = None;
    for candidate in counts {
        if best.as_ref().map_or(true, |b| candidate.count > b.count) {
            best = Some(candidate);
        }
    }
    Ok(best)
}

/// Longest run of consecutive calendar days with at least one entry
pub fn longest_streak(dataset: &Dataset) -> Result<usize, AnalyticsError> {
    let (start, end) = match (dataset.min_date(), dataset.max_date()) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(AnalyticsError::EmptyDataset(
                "cannot compute a streak without entries".to_string(),
            ))
        }
    };

    let present: BTreeSet<NaiveDate> = dataset.entries().iter().map(Entry::date).collect();

    let mut current = 0;
    let mut longest = 0;
    for day in start.iter_days().take_while(|d| *d <= end) {
        if present.contains(&day) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    Ok(longest)
}

/// Whether some run of `window_days` consecutive days has every daily mean of
/// `field` at or above `threshold`
pub fn sustained_threshold(
    dataset: &Dataset,
    field: &str,
    threshold: f64,
    window_days: usize,
) -> Result<bool, AnalyticsError> {
    let daily = daily_series(dataset, field)?;
    let qualifying: Vec<Option<f64>> = daily
        .values
        .iter()
        .map(|v| v.map(|v| if v >= threshold { 1.0 } else { 0.0 }))
        .collect();

    // A full window of qualifying days averages exactly 1
    Ok(rolling_mean(&qualifying, window_days, window_days)
        .iter()
        .any(|m| *m == Some(1.0)))
}

/// Outcome of a cumulative-count milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CumulativeMilestone {
    pub reached: bool,
    /// Whole days from the milestone occurrence to the last log day
    pub days_since: Option<i64>,
}

/// Whether the text `field` has been logged at least `count` times
pub fn cumulative_milestone(
    dataset: &Dataset,
    field: &str,
    count: usize,
) -> Result<CumulativeMilestone, AnalyticsError> {
    let last = dataset.max_date().ok_or_else(|| {
        AnalyticsError::EmptyDataset(format!("cannot count '{field}' without entries"))
    })?;

    let occurrence = dataset
        .entries()
        .iter()
        .filter(|e| e.text(field).is_some())
        .nth(count.saturating_sub(1));

    Ok(match occurrence {
        Some(entry) if count > 0 => CumulativeMilestone {
            reached: true,
            days_since: Some((last - entry.date()).num_days()),
        },
        _ => CumulativeMilestone {
            reached: false,
            days_since: None,
        },
    })
}

/// Dashboard summary over the last `period_days` with default thresholds
pub fn summary(dataset: &Dataset, period_days: u32) -> Result<SummaryMetrics, AnalyticsError> {
    summary_with_config(
        dataset,
        &AnalyticsConfig {
            period_days,
            ..Default::default()
        },
    )
}

/// Dashboard summary using the periods and thresholds of `config`
pub fn summary_with_config(
    dataset: &Dataset,
    config: &AnalyticsConfig,
) -> Result<SummaryMetrics, AnalyticsError> {
    let slice = PeriodSlice::last_days(dataset, config.period_days)?;
    log::debug!(
        "summary period {} to {} holds {} of {} entries",
        slice.start(),
        slice.end(),
        slice.len(),
        dataset.len()
    );

    let best_pomodoro_day = latest_flag_date(&slice, USED_POMODORO);
    let best_pomodoro_hours = best_pomodoro_day
        .and_then(|day| flagged_total_on(&slice, USED_POMODORO, WORK_HOURS, day));

    let happy = cumulative_milestone(dataset, HAPPY_MOMENT, config.happy_milestone_count)?;
    let milestone_hydration = sustained_threshold(
        &dataset.since(slice.start()),
        HYDRATION,
        config.hydration_threshold,
        config.hydration_streak_days,
    )?;

    Ok(SummaryMetrics {
        period_days: config.period_days,
        period_start: slice.start(),
        period_end: slice.end(),
        happy_moments_count: event_count(&slice, HAPPY_MOMENT),
        pomodoro_usage_pct: flag_ratio_pct(&slice, USED_POMODORO)?,
        best_pomodoro_day,
        best_pomodoro_hours,
        streak_days: longest_streak(dataset)?,
        high_energy_days: threshold_count(&slice, PHYSICAL_ENERGY, config.high_energy_threshold),
        most_used_mood: most_frequent(&slice, MOOD)?,
        milestone_hydration,
        milestone_happy: happy.reached,
        days_since_happy_milestone: happy.days_since,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + Duration::days(offset)
    }

    fn make_entry(offset: i64) -> Entry {
        Entry::on(day(offset))
    }

    fn dataset_on(offsets: &[i64]) -> Dataset {
        Dataset::with_standard_columns(offsets.iter().map(|o| make_entry(*o)).collect())
    }

    #[test]
    fn test_streak_with_gap() {
        // Days 1, 2, 3, gap, 5
        assert_eq!(longest_streak(&dataset_on(&[1, 2, 3, 5])).unwrap(), 3);
    }

    #[test]
    fn test_streak_counts_days_not_entries() {
        let dataset = dataset_on(&[0, 0, 0, 2, 3, 3, 4, 10]);
        assert_eq!(longest_streak(&dataset).unwrap(), 3);
    }

    #[test]
    fn test_streak_spans_whole_log() {
        let offsets: Vec<i64> = (0..40).collect();
        let dataset = dataset_on(&offsets);

        let metrics = summary(&dataset, 7).unwrap();
        assert_eq!(metrics.streak_days, 40);
    }

    #[test]
    fn test_period_slice_boundary_inclusive() {
        let dataset = dataset_on(&[0, 9, 10, 20, 40]);
        let slice = PeriodSlice::last_days(&dataset, 30).unwrap();

        assert_eq!(slice.start(), day(10));
        assert_eq!(slice.len(), 3);
    }

    #[test]
    fn test_event_and_ratio() {
        let dataset = Dataset::with_standard_columns(vec![
            make_entry(0).with(HAPPY_MOMENT, "old news").with(USED_POMODORO, true),
            make_entry(40).with(HAPPY_MOMENT, "sunny walk").with(USED_POMODORO, true),
            make_entry(41).with(USED_POMODORO, false),
            make_entry(42).with(HAPPY_MOMENT, "call with mum"),
            make_entry(43).with(USED_POMODORO, true),
        ]);
        let slice = PeriodSlice::last_days(&dataset, 30).unwrap();

        assert_eq!(event_count(&slice, HAPPY_MOMENT), 2);
        assert!((flag_ratio_pct(&slice, USED_POMODORO).unwrap() - 50.0).abs() < 1e-12);
        assert_eq!(latest_flag_date(&slice, USED_POMODORO), Some(day(43)));
    }

    #[test]
    fn test_ratio_over_empty_slice() {
        let dataset = dataset_on(&[5]);
        let slice = PeriodSlice::new(&dataset, day(10), day(20));

        assert!(matches!(
            flag_ratio_pct(&slice, USED_POMODORO),
            Err(AnalyticsError::DivisionUndefined(_))
        ));
        assert!(matches!(
            most_frequent(&slice, MOOD),
            Err(AnalyticsError::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_latest_flag_date_none() {
        let dataset = Dataset::with_standard_columns(vec![make_entry(0).with(USED_POMODORO, false)]);
        let slice = PeriodSlice::last_days(&dataset, 30).unwrap();

        assert_eq!(latest_flag_date(&slice, USED_POMODORO), None);
    }

    #[test]
    fn test_flagged_total_on() {
        let dataset = Dataset::with_standard_columns(vec![
            make_entry(1).with(USED_POMODORO, true).with(WORK_HOURS, 2.5),
            make_entry(1).with(USED_POMODORO, true).with(WORK_HOURS, 3.0),
            make_entry(1).with(USED_POMODORO, false).with(WORK_HOURS, 4.0),
            make_entry(2).with(USED_POMODORO, true),
        ]);
        let slice = PeriodSlice::last_days(&dataset, 30).unwrap();

        assert_eq!(flagged_total_on(&slice, USED_POMODORO, WORK_HOURS, day(1)), Some(5.5));
        assert_eq!(flagged_total_on(&slice, USED_POMODORO, WORK_HOURS, day(2)), None);
    }

    #[test]
    fn test_threshold_count() {
        let dataset = Dataset::with_standard_columns(vec![
            make_entry(0).with(PHYSICAL_ENERGY, 6.0),
            make_entry(0).with(PHYSICAL_ENERGY, 5.9),
            make_entry(1).with(PHYSICAL_ENERGY, 7.0),
            make_entry(2),
        ]);
        let slice = PeriodSlice::last_days(&dataset, 30).unwrap();

        assert_eq!(threshold_count(&slice, PHYSICAL_ENERGY, 6.0), 2);
    }

    #[test]
    fn test_most_frequent_tie_goes_to_first_seen() {
        let dataset = Dataset::with_standard_columns(vec![
            make_entry(0).with(MOOD, "Sad"),
            make_entry(1).with(MOOD, "Calm"),
            make_entry(2).with(MOOD, "Calm"),
            make_entry(3).with(MOOD, "Sad"),
            make_entry(4),
        ]);
        let slice = PeriodSlice::last_days(&dataset, 30).unwrap();

        assert_eq!(
            most_frequent(&slice, MOOD).unwrap(),
            Some(LabelCount {
                label: "Sad".to_string(),
                count: 2
            })
        );
    }

    #[test]
    fn test_most_frequent_without_labels() {
        let dataset = dataset_on(&[0, 1]);
        let slice = PeriodSlice::last_days(&dataset, 30).unwrap();

        assert_eq!(most_frequent(&slice, MOOD).unwrap(), None);
    }

    #[test]
    fn test_sustained_hydration() {
        fn hydrated(offsets: &[i64], value: f64) -> Vec<Entry> {
            offsets
                .iter()
                .map(|o| make_entry(*o).with(HYDRATION, value))
                .collect()
        }

        let mut entries = hydrated(&[0, 1, 2, 3, 4, 5, 6], 9.0);
        entries.extend(hydrated(&[3], 7.5));
        // Day 3 averages 8.25: still qualifies
        let dataset = Dataset::with_standard_columns(entries);
        assert!(sustained_threshold(&dataset, HYDRATION, 8.0, 7).unwrap());

        // A gap day breaks the window even if every logged day qualifies
        let dataset = Dataset::with_standard_columns(hydrated(&[0, 1, 2, 4, 5, 6, 7, 8], 10.0));
        assert!(!sustained_threshold(&dataset, HYDRATION, 8.0, 7).unwrap());

        // Six qualifying days are not enough
        let dataset = Dataset::with_standard_columns(hydrated(&[0, 1, 2, 3, 4, 5], 10.0));
        assert!(!sustained_threshold(&dataset, HYDRATION, 8.0, 7).unwrap());
    }

    #[test]
    fn test_happy_milestone_threshold() {
        let happy = |n: i64| -> Dataset {
            Dataset::with_standard_columns(
                (0..n)
                    .map(|i| make_entry(i).with(HAPPY_MOMENT, "good day"))
                    .chain(std::iter::once(make_entry(n + 9)))
                    .collect(),
            )
        };

        let reached = cumulative_milestone(&happy(50), HAPPY_MOMENT, 50).unwrap();
        assert!(reached.reached);
        // 50th occurrence on day 49, last log day 59
        assert_eq!(reached.days_since, Some(10));

        let missed = cumulative_milestone(&happy(49), HAPPY_MOMENT, 50).unwrap();
        assert_eq!(
            missed,
            CumulativeMilestone {
                reached: false,
                days_since: None
            }
        );
    }

    #[test]
    fn test_summary_metrics() {
        let mut entries = Vec::new();
        for i in 0..10 {
            entries.push(
                make_entry(i)
                    .with(PHYSICAL_ENERGY, if i % 2 == 0 { 6.0 } else { 3.0 })
                    .with(HYDRATION, 8.0)
                    .with(MOOD, if i < 6 { "Content" } else { "Anxious" })
                    .with(USED_POMODORO, i % 5 == 0)
                    .with(WORK_HOURS, 4.0),
            );
        }
        entries.push(make_entry(3).with(HAPPY_MOMENT, "finished the book"));

        let metrics = summary(&Dataset::with_standard_columns(entries), 30).unwrap();

        assert_eq!(metrics.period_start, day(-21));
        assert_eq!(metrics.period_end, day(9));
        assert_eq!(metrics.happy_moments_count, 1);
        assert!((metrics.pomodoro_usage_pct - 2.0 / 11.0 * 100.0).abs() < 1e-9);
        assert_eq!(metrics.best_pomodoro_day, Some(day(5)));
        assert_eq!(metrics.best_pomodoro_hours, Some(4.0));
        assert_eq!(metrics.streak_days, 10);
        assert_eq!(metrics.high_energy_days, 5);
        assert_eq!(
            metrics.most_used_mood,
            Some(LabelCount {
                label: "Content".to_string(),
                count: 6
            })
        );
        assert!(metrics.milestone_hydration);
        assert!(!metrics.milestone_happy);
        assert_eq!(metrics.days_since_happy_milestone, None);
    }

    #[test]
    fn test_hydration_milestone_is_period_scoped() {
        let mut entries: Vec<Entry> = (0..7).map(|i| make_entry(i).with(HYDRATION, 9.0)).collect();
        entries.push(make_entry(60).with(HYDRATION, 2.0));
        let dataset = Dataset::with_standard_columns(entries);

        // The only qualifying week ends well before the 30-day period
        assert!(!summary(&dataset, 30).unwrap().milestone_hydration);
        assert!(summary(&dataset, 60).unwrap().milestone_hydration);
    }

    #[test]
    fn test_hydration_milestone_default_threshold() {
        let week = |value: f64| -> Dataset {
            Dataset::with_standard_columns(
                (0..7).map(|i| make_entry(i).with(HYDRATION, value)).collect(),
            )
        };

        assert!(summary(&week(7.0), 30).unwrap().milestone_hydration);
        assert!(!summary(&week(6.5), 30).unwrap().milestone_hydration);
    }

    #[test]
    fn test_oversized_period_covers_whole_log() {
        let dataset = Dataset::with_standard_columns(vec![
            make_entry(0).with(USED_POMODORO, true),
            make_entry(100).with(USED_POMODORO, false),
        ]);

        let metrics = summary(&dataset, u32::MAX).unwrap();

        assert_eq!(metrics.period_start, day(0));
        assert_eq!(metrics.period_end, day(100));
        assert!((metrics.pomodoro_usage_pct - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_empty_dataset() {
        let empty = Dataset::with_standard_columns(vec![]);

        assert!(matches!(summary(&empty, 30), Err(AnalyticsError::EmptyDataset(_))));
        assert!(matches!(longest_streak(&empty), Err(AnalyticsError::EmptyDataset(_))));
        assert!(matches!(
            cumulative_milestone(&empty, HAPPY_MOMENT, 50),
            Err(AnalyticsError::EmptyDataset(_))
        ));
        assert!(matches!(
            sustained_threshold(&empty, HYDRATION, 8.0, 7),
            Err(AnalyticsError::EmptyDataset(_))
        ));
    }
}
