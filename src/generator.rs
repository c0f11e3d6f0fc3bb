//! Synthetic check-in logs
//!
//! Deterministic sample data for tests and demos. The same `(days, start_date, seed)`
//! always produces the same dataset.

use chrono::{Duration, NaiveDate, NaiveTime};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;

use crate::breakdown::TIME_CATEGORIES;
use crate::mapping::MOOD_SCALE;
use crate::types::{
    Dataset, Entry, CAFFEINE, COGNITIVE_CLARITY, HAPPY_MOMENT, HYDRATION, MOOD, PHYSICAL_ENERGY,
    SLEEP_QUALITY, STRESS, TIME_CATEGORY, USED_POMODORO, WORK_HOURS,
};

/// Probability that a day has no check-ins at all
const SKIPPED_DAY_PROB: f64 = 0.1;

/// Probability that a check-in records a happy moment
const HAPPY_MOMENT_PROB: f64 = 0.35;

/// Probability that an individual numeric answer is left blank
const BLANK_ANSWER_PROB: f64 = 0.05;

/// Check-in windows (hour of day)
const CHECK_IN_HOURS: [u32; 3] = [8, 13, 19];

const HAPPY_NOTES: [&str; 6] = [
    "Morning walk in the sun",
    "Coffee with a friend",
    "Finished a hard task",
    "Good workout",
    "Cooked a new recipe",
    "Quiet evening reading",
];

/// Generate `days` days of check-ins starting at `start_date`
///
/// Each day gets one to three check-ins unless it is randomly skipped.
/// Non-positive `days` yields an empty dataset.
pub fn generate(days: i64, start_date: NaiveDate, seed: u64) -> Dataset {
    if days <= 0 {
        return Dataset::with_standard_columns(Vec::new());
    }

    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    let moods: Vec<&str> = MOOD_SCALE.labels().collect();
    let mut entries = Vec::new();

    for offset in 0..days {
        let date = start_date + Duration::days(offset);
        if rng.random_bool(SKIPPED_DAY_PROB) {
            continue;
        }

        let check_ins = rng.random_range(1..=CHECK_IN_HOURS.len());
        for hour in &CHECK_IN_HOURS[..check_ins] {
            let minute = rng.random_range(0..60);
            let time = NaiveTime::from_hms_opt(*hour, minute, 0).unwrap_or(NaiveTime::MIN);
            entries.push(generate_check_in(&mut rng, date.and_time(time), &moods));
        }
    }

    log::debug!(
        "generated {} check-ins over {days} days from {start_date} (seed {seed})",
        entries.len()
    );

    Dataset::with_standard_columns(entries)
}

fn generate_check_in(rng: &mut ChaCha12Rng, timestamp: chrono::NaiveDateTime, moods: &[&str]) -> Entry {
    // Energy follows sleep, stress runs against energy
    let sleep_quality: i32 = rng.random_range(1..=5);
    let physical_energy = (sleep_quality + rng.random_range(-1..=2)).clamp(1, 7);
    let stress = (5 - physical_energy / 2 + rng.random_range(-1..=1)).clamp(1, 4);

    let mut entry = Entry::new(timestamp)
        .with(SLEEP_QUALITY, f64::from(sleep_quality))
        .with(PHYSICAL_ENERGY, f64::from(physical_energy))
        .with(STRESS, f64::from(stress))
        .with(MOOD, moods[rng.random_range(0..moods.len())])
        .with(TIME_CATEGORY, TIME_CATEGORIES[rng.random_range(0..TIME_CATEGORIES.len())])
        .with(USED_POMODORO, rng.random_bool(0.5));

    let optional = [
        (COGNITIVE_CLARITY, f64::from(rng.random_range(1..=7_i32))),
        (HYDRATION, f64::from(rng.random_range(1..=10_i32))),
        (CAFFEINE, f64::from(rng.random_range(0..=4_i32))),
        (WORK_HOURS, f64::from(rng.random_range(0..=16_i32)) / 2.0),
    ];
    for (name, value) in optional {
        if !rng.random_bool(BLANK_ANSWER_PROB) {
            entry = entry.with(name, value);
        }
    }

    if rng.random_bool(HAPPY_MOMENT_PROB) {
        entry = entry.with(HAPPY_MOMENT, HAPPY_NOTES[rng.random_range(0..HAPPY_NOTES.len())]);
    }

    entry
}
