//! Correlation analysis
//!
//! Pearson correlation between a target metric and every other numeric metric,
//! computed on pairwise-complete observations and ranked most-negative first.
//! A fixed core-metric matrix is always produced alongside.

use crate::error::AnalyticsError;
use crate::types::{
    CorrelationMatrix, CorrelationReport, Dataset, MetricCorrelation,
    CAFFEINE, COGNITIVE_CLARITY, HYDRATION, MOOD, PHYSICAL_ENERGY, STRESS,
};
use std::cmp::Ordering;

/// Metrics of the fixed dashboard correlation panel
pub const CORE_METRICS: [&str; 6] = [
    PHYSICAL_ENERGY,
    COGNITIVE_CLARITY,
    MOOD,
    STRESS,
    CAFFEINE,
    HYDRATION,
];

/// Rank every numeric metric by its correlation with `target_metric`
pub fn correlate(dataset: &Dataset, target_metric: &str) -> Result<CorrelationReport, AnalyticsError> {
    let mapped = dataset.with_scaled_categories();
    let target = mapped.numeric_column(target_metric)?;

    let mut ranked = Vec::new();
    for column in mapped.numeric_columns() {
        if column.name == target_metric {
            continue;
        }
        let other = mapped.numeric_column(&column.name)?;
        let (coefficient, pairs) = pearson(&target, &other);
        if coefficient.is_none() {
            log::warn!(
                "correlation of '{}' with '{}' is undefined ({} pairs)",
                target_metric,
                column.name,
                pairs
            );
        }
        ranked.push(MetricCorrelation {
            metric: column.name.clone(),
            coefficient,
            pairs,
        });
    }

    ranked.sort_by(|a, b| compare_coefficients(a.coefficient, b.coefficient));

    let core_matrix = matrix_of(&mapped, &CORE_METRICS)?;

    Ok(CorrelationReport {
        target_metric: target_metric.to_string(),
        ranked,
        core_matrix,
    })
}

/// Pairwise correlation matrix over the given metrics (categories mapped first)
pub fn correlation_matrix(
    dataset: &Dataset,
    metrics: &[&str],
) -> Result<CorrelationMatrix, AnalyticsError> {
    matrix_of(&dataset.with_scaled_categories(), metrics)
}

fn matrix_of(mapped: &Dataset, metrics: &[&str]) -> Result<CorrelationMatrix, AnalyticsError> {
    let columns = metrics
        .iter()
        .map(|m| mapped.numeric_column(m))
        .collect::<Result<Vec<_>, _>>()?;

    let n = metrics.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let (r, _) = pearson(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        metrics: metrics.iter().map(|m| m.to_string()).collect(),
        values,
    })
}

/// Pearson coefficient over positions where both values are present
///
/// Returns the coefficient (`None` with fewer than 2 pairs or zero variance on
/// either side) and the number of pairs used.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> (Option<f64>, usize) {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    let n = pairs.len();

    if n < 2 || is_constant(pairs.iter().map(|p| p.0)) || is_constant(pairs.iter().map(|p| p.1)) {
        return (None, n);
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    (Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)), n)
}

fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

/// Ascending, undefined coefficients last
fn compare_coefficients(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
