//! Statistics kernel
//!
//! Total functions over slices of `f64`. Empty input produces a zero result
//! instead of an error.

use crate::models::MetricStatistics;
use serde::{Deserialize, Serialize};

/// Share of values trimmed from each end by [`trimmed_mean`]
pub const DEFAULT_TRIM_FRACTION: f64 = 0.1;
/// Z-score above which a value is an outlier
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 2.0;

/// Comparison applied by [`ensemble_probability`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Comparison {
    #[must_use]
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Greater => value > threshold,
            Comparison::GreaterOrEqual => value >= threshold,
            Comparison::Less => value < threshold,
            Comparison::LessOrEqual => value <= threshold,
        }
    }
}

#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[must_use]
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population standard deviation; 0 for fewer than two values
#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Mean after discarding `trim_fraction` of the sorted values from each end.
///
/// Up to two values this is the plain mean and for three it is the median.
/// From four values on at least one value is trimmed from each end and at
/// least two values are always kept.
#[must_use]
pub fn trimmed_mean(values: &[f64], trim_fraction: f64) -> f64 {
    let n = values.len();
    if n <= 2 {
        return mean(values);
    }
    if n == 3 {
        return median(values);
    }

    let sorted = sorted(values);
    let mut trim_count = (n as f64 * trim_fraction).floor() as usize;
    if trim_count == 0 {
        trim_count = 1;
    }
    trim_count = trim_count.min((n - 2) / 2);

    mean(&sorted[trim_count..n - trim_count])
}

/// Indices of values whose z-score magnitude exceeds `threshold`.
///
/// Needs more than two values and a non-zero spread, otherwise nothing is
/// flagged.
#[must_use]
pub fn find_outlier_indices(values: &[f64], threshold: f64) -> Vec<usize> {
    if values.len() <= 2 {
        return Vec::new();
    }
    let sd = std_dev(values);
    if sd <= 0.0 {
        return Vec::new();
    }
    let avg = mean(values);
    values
        .iter()
        .enumerate()
        .filter(|(_, value)| ((*value - avg) / sd).abs() > threshold)
        .map(|(index, _)| index)
        .collect()
}

/// Percentage (0-100) of values satisfying `comparison` against `threshold`
#[must_use]
pub fn ensemble_probability(values: &[f64], threshold: f64, comparison: Comparison) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let hits = values
        .iter()
        .filter(|value| comparison.holds(**value, threshold))
        .count();
    hits as f64 / values.len() as f64 * 100.0
}

/// Mean, median, extremes and spread of a set of values
#[must_use]
pub fn metric_statistics(values: &[f64]) -> MetricStatistics {
    if values.is_empty() {
        return MetricStatistics::default();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    MetricStatistics {
        mean: mean(values),
        median: median(values),
        min,
        max,
        std_dev: std_dev(values),
        range: max - min,
    }
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}
