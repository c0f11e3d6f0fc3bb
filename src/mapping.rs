//! Categorical mapping
//!
//! Converts ordinal labels (mood) to a fixed numeric scale so they can take part in
//! correlation and trend computations. Unmapped labels become missing values.

use crate::error::AnalyticsError;
use crate::types::{Column, ColumnKind, Dataset, Entry, Value, MOOD};

/// Immutable label-to-score table
#[derive(Debug, Clone, Copy)]
pub struct CategoricalScale {
    pairs: &'static [(&'static str, u8)],
}

impl CategoricalScale {
    pub const fn new(pairs: &'static [(&'static str, u8)]) -> Self {
        Self { pairs }
    }

    /// Score for a label, `None` if the label is not on the scale
    pub fn score(&self, label: &str) -> Option<f64> {
        self.pairs
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, score)| f64::from(*score))
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pairs.iter().map(|(name, _)| *name)
    }
}

/// Mood labels scored 1 (worst) to 10 (best)
pub const MOOD_SCALE: CategoricalScale = CategoricalScale::new(&[
    ("Joyful", 10),
    ("Content", 8),
    ("Calm", 7),
    ("Confused", 5),
    ("Annoyed", 4),
    ("Anxious", 3),
    ("Sad", 3),
    ("Scared", 2),
    ("Angry", 1),
    ("Exhausted", 1),
]);

/// Scale registered for a categorical column, if any
pub fn scale_for(field: &str) -> Option<&'static CategoricalScale> {
    match field {
        MOOD => Some(&MOOD_SCALE),
        _ => None,
    }
}

/// Map each entry's label in `field` through `scale`
pub fn map_categorical(entries: &[Entry], field: &str, scale: &CategoricalScale) -> Vec<Option<f64>> {
    entries
        .iter()
        .map(|e| e.text(field).and_then(|label| scale.score(label)))
        .collect()
}

impl Dataset {
    /// Copy of the dataset whose categorical `field` has become numeric
    pub fn with_mapped_column(
        &self,
        field: &str,
        scale: &CategoricalScale,
    ) -> Result<Dataset, AnalyticsError> {
        self.require_kind(field, ColumnKind::Categorical)?;

        let scores = map_categorical(self.entries(), field, scale);
        let entries = self
            .entries()
            .iter()
            .zip(scores)
            .map(|(entry, score)| {
                let mut entry = entry.clone();
                entry
                    .values
                    .insert(field.to_string(), score.map(Value::Number));
                entry
            })
            .collect();

        let columns = self
            .columns()
            .iter()
            .map(|c| {
                if c.name == field {
                    Column::new(field, ColumnKind::Numeric)
                } else {
                    c.clone()
                }
            })
            .collect();

        Ok(Dataset::new(columns, entries))
    }

    /// Copy with every categorical column that has a registered scale mapped
    pub fn with_scaled_categories(&self) -> Dataset {
        let mut mapped = self.clone();
        for column in self.columns() {
            if column.kind != ColumnKind::Categorical {
                continue;
            }
            if let Some(scale) = scale_for(&column.name) {
                // Kind was checked above, so mapping cannot fail
                if let Ok(next) = mapped.with_mapped_column(&column.name, scale) {
                    mapped = next;
                }
            }
        }
        mapped
    }
}
