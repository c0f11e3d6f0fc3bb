//! Core types for the analytics engine
//!
//! This module defines the log data model (columns, values, entries, datasets) and
//! the report structures produced by each analytics stage and handed to renderers.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::AnalyticsError;

/// Physical energy rating (1-7)
pub const PHYSICAL_ENERGY: &str = "physical_energy";
/// Cognitive clarity rating (1-7)
pub const COGNITIVE_CLARITY: &str = "cognitive_clarity";
/// Mood label (categorical)
pub const MOOD: &str = "mood";
/// Stress rating (1-4)
pub const STRESS: &str = "stress";
/// Sleep quality rating (1-5)
pub const SLEEP_QUALITY: &str = "sleep_quality";
/// Glasses of water (1-10)
pub const HYDRATION: &str = "hydration";
/// Caffeinated drinks (0-4)
pub const CAFFEINE: &str = "caffeine";
/// Hours worked in the session (0-12)
pub const WORK_HOURS: &str = "work_hours";
/// Whether a pomodoro timer was used
pub const USED_POMODORO: &str = "used_pomodoro";
/// Free-text happy moment note
pub const HAPPY_MOMENT: &str = "happy_moment";
/// What the logged hours were spent on (categorical)
pub const TIME_CATEGORY: &str = "time_category";

/// Kind of values held by a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Real-valued measurement
    Numeric,
    /// Label from a fixed enumerated set
    Categorical,
    /// Optional free text; presence is the signal
    Text,
    /// Boolean marker
    Flag,
}

/// Column definition (name and kind)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: &str, kind: ColumnKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

/// The columns of a standard check-in log, in dashboard order
pub fn standard_columns() -> Vec<Column> {
    vec![
        Column::new(PHYSICAL_ENERGY, ColumnKind::Numeric),
        Column::new(COGNITIVE_CLARITY, ColumnKind::Numeric),
        Column::new(MOOD, ColumnKind::Categorical),
        Column::new(STRESS, ColumnKind::Numeric),
        Column::new(SLEEP_QUALITY, ColumnKind::Numeric),
        Column::new(HYDRATION, ColumnKind::Numeric),
        Column::new(CAFFEINE, ColumnKind::Numeric),
        Column::new(WORK_HOURS, ColumnKind::Numeric),
        Column::new(TIME_CATEGORY, ColumnKind::Categorical),
        Column::new(USED_POMODORO, ColumnKind::Flag),
        Column::new(HAPPY_MOMENT, ColumnKind::Text),
    ]
}

/// A single logged value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Flag(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// One log record
///
/// A key that is absent or mapped to `None` is a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// When the check-in was logged (local time)
    pub timestamp: NaiveDateTime,
    /// Column name to value
    #[serde(default)]
    pub values: BTreeMap<String, Option<Value>>,
}

impl Entry {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            values: BTreeMap::new(),
        }
    }

    /// Entry at midnight of the given date
    pub fn on(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN))
    }

    /// Builder-style setter
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), Some(value.into()));
        self
    }

    /// Calendar date of the entry (time of day truncated)
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).and_then(Option::as_ref)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_flag)
    }
}

/// Ordered-by-time collection of entries plus their column schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DatasetRecord")]
pub struct Dataset {
    columns: Vec<Column>,
    entries: Vec<Entry>,
}

/// Wire form of a dataset; entries may arrive in any order
#[derive(Deserialize)]
struct DatasetRecord {
    columns: Vec<Column>,
    entries: Vec<Entry>,
}

impl From<DatasetRecord> for Dataset {
    fn from(record: DatasetRecord) -> Self {
        Dataset::new(record.columns, record.entries)
    }
}

impl Dataset {
    /// Create a dataset; entries are stably sorted by timestamp
    pub fn new(columns: Vec<Column>, mut entries: Vec<Entry>) -> Self {
        entries.sort_by_key(|e| e.timestamp);
        Self { columns, entries }
    }

    /// Create a dataset using the standard check-in columns
    pub fn with_standard_columns(entries: Vec<Entry>) -> Self {
        Self::new(standard_columns(), entries)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric columns in schema order
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
    }

    pub fn min_date(&self) -> Option<NaiveDate> {
        self.entries.first().map(Entry::date)
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.entries.last().map(Entry::date)
    }

    /// First day of a window reaching `span` back from the last log day
    ///
    /// A span that runs off the calendar starts at the first log day.
    pub fn window_start(&self, span: Duration) -> Option<NaiveDate> {
        let end = self.max_date()?;
        end.checked_sub_signed(span).or_else(|| self.min_date())
    }

    /// Values of a numeric column, one per entry
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>, AnalyticsError> {
        self.require_kind(name, ColumnKind::Numeric)?;
        Ok(self.entries.iter().map(|e| e.number(name)).collect())
    }

    /// Fail with `InvalidMetric` unless `name` is a column of the given kind
    pub fn require_kind(&self, name: &str, kind: ColumnKind) -> Result<&Column, AnalyticsError> {
        match self.column(name) {
            Some(column) if column.kind == kind => Ok(column),
            Some(column) => Err(AnalyticsError::invalid_metric(
                name,
                format!("expected a {:?} column, found {:?}", kind, column.kind),
            )),
            None => Err(AnalyticsError::invalid_metric(name, "no such column")),
        }
    }

    /// Copy holding only entries dated on or after `start`
    pub fn since(&self, start: NaiveDate) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            entries: self
                .entries
                .iter()
                .filter(|e| e.date() >= start)
                .cloned()
                .collect(),
        }
    }

    /// Load a dataset from JSON
    pub fn from_json(json: &str) -> Result<Self, AnalyticsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the dataset to JSON
    pub fn to_json(&self) -> Result<String, AnalyticsError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Date-indexed series with one slot per calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    /// First calendar day
    pub start: NaiveDate,
    /// One value per day from `start`; `None` is a gap
    pub values: Vec<Option<f64>>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Last calendar day covered
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(self.values.len().saturating_sub(1) as i64)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.values.len()).map(move |i| self.start + Duration::days(i as i64))
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        let offset = (date - self.start).num_days();
        if offset < 0 {
            return None;
        }
        self.values.get(offset as usize).copied().flatten()
    }

    /// Number of days with a value
    pub fn observed_days(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Correlation of one metric against the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCorrelation {
    pub metric: String,
    /// Pearson coefficient; `None` when undefined
    pub coefficient: Option<f64>,
    /// Pairwise-complete observations used
    pub pairs: usize,
}

/// Symmetric pairwise correlation matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub metrics: Vec<String>,
    /// Row-major coefficients, `values[i][j]` pairs `metrics[i]` with `metrics[j]`
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.metrics.iter().position(|m| m == a)?;
        let j = self.metrics.iter().position(|m| m == b)?;
        self.values[i][j]
    }
}

/// Ranked correlations for a target plus the fixed core panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub target_metric: String,
    /// Ascending by coefficient, undefined coefficients last
    pub ranked: Vec<MetricCorrelation>,
    pub core_matrix: CorrelationMatrix,
}

/// Trend direction over the lookback window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improved,
    /// Also reported for an exactly flat fit
    Declined,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Improved => "improved",
            TrendDirection::Declined => "declined",
        }
    }
}

/// Output of the trend estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub metric: String,
    /// Human-readable metric name
    pub label: String,
    pub window_days: usize,
    pub lookback_weeks: u32,
    /// Raw daily averages over the lookback window
    pub daily: DailySeries,
    /// Trailing rolling mean (same length as `daily`)
    pub rolling: Vec<Option<f64>>,
    /// Regression line evaluated at each day index
    pub fitted: Vec<f64>,
    pub slope: f64,
    pub intercept: f64,
    /// `fitted[N-1] - fitted[0]`
    pub change: f64,
    pub direction: TrendDirection,
    pub summary: String,
}

/// Most frequent categorical value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Dashboard achievement and summary metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub period_days: u32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Entries in the period with a happy moment
    pub happy_moments_count: usize,
    /// Percentage of period entries that used a pomodoro timer
    pub pomodoro_usage_pct: f64,
    /// Latest period day with a pomodoro session
    pub best_pomodoro_day: Option<NaiveDate>,
    /// Work hours logged in pomodoro sessions on `best_pomodoro_day`
    pub best_pomodoro_hours: Option<f64>,
    /// Longest run of tracked days across the whole log
    pub streak_days: usize,
    /// Period entries at or above the high-energy threshold
    pub high_energy_days: usize,
    pub most_used_mood: Option<LabelCount>,
    /// Sustained daily hydration milestone reached
    pub milestone_hydration: bool,
    /// Cumulative happy-moment milestone reached
    pub milestone_happy: bool,
    /// Whole days between the milestone occurrence and the last log day
    pub days_since_happy_milestone: Option<i64>,
}

/// Hours logged against one time category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryHours {
    pub category: String,
    pub hours: f64,
}

/// Logged hours split by time category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBreakdown {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_hours: f64,
    /// Categories in name order
    pub breakdown: Vec<CategoryHours>,
}
