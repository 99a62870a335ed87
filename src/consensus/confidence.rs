//! Confidence scorer
//!
//! Turns the consensus of a bucket into a bounded score. The score combines
//! model agreement, the spread of temperature and precipitation, and how many
//! models contributed.

use crate::models::{AggregatedForecast, ConfidenceLevel, ModelConsensus};
use serde::{Deserialize, Serialize};

/// Temperature standard deviation at which the temperature factor reaches 0 (°C)
const TEMPERATURE_SPREAD_CEILING: f64 = 4.0;
/// Precipitation standard deviation at which the precipitation factor reaches 0 (mm)
const PRECIPITATION_SPREAD_CEILING: f64 = 5.0;
/// Number of models from which coverage is complete
const FULL_COVERAGE_MODELS: f64 = 3.0;

const AGREEMENT_WEIGHT: f64 = 0.4;
const TEMPERATURE_WEIGHT: f64 = 0.35;
const PRECIPITATION_WEIGHT: f64 = 0.25;

/// Share of the score that does not depend on model coverage
const COVERAGE_FLOOR: f64 = 0.7;

/// Per-step decay of a bucket's weight in the overall score
const LEAD_TIME_DECAY: f64 = 0.95;

/// Inputs that produced a confidence score, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    pub agreement: f64,
    pub temperature: f64,
    pub precipitation: f64,
    pub coverage: f64,
}

/// A confidence level together with the factors behind it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResult {
    pub confidence: ConfidenceLevel,
    pub factors: ConfidenceFactors,
}

/// Score the consensus of one bucket
#[must_use]
pub fn score_consensus(consensus: &ModelConsensus) -> ConfidenceResult {
    let model_count = consensus.model_count();
    let factors = ConfidenceFactors {
        agreement: consensus.agreement_score.clamp(0.0, 1.0),
        temperature: spread_factor(consensus.temperature.std_dev, TEMPERATURE_SPREAD_CEILING),
        precipitation: spread_factor(
            consensus.precipitation.std_dev,
            PRECIPITATION_SPREAD_CEILING,
        ),
        coverage: (model_count as f64 / FULL_COVERAGE_MODELS).min(1.0),
    };

    if model_count == 0 {
        return ConfidenceResult {
            confidence: ConfidenceLevel::clamped(0.0),
            factors,
        };
    }

    let consensus_score = AGREEMENT_WEIGHT * factors.agreement
        + TEMPERATURE_WEIGHT * factors.temperature
        + PRECIPITATION_WEIGHT * factors.precipitation;
    let score = consensus_score * (COVERAGE_FLOOR + (1.0 - COVERAGE_FLOOR) * factors.coverage);

    ConfidenceResult {
        confidence: ConfidenceLevel::clamped(score),
        factors,
    }
}

/// Overall confidence from bucket confidences in ascending time order.
///
/// Later buckets weigh less. No buckets yields the neutral medium level.
#[must_use]
pub fn overall_confidence(levels: &[ConfidenceLevel]) -> ConfidenceLevel {
    if levels.is_empty() {
        return ConfidenceLevel::neutral();
    }

    let (weighted, total) = levels.iter().enumerate().fold(
        (0.0, 0.0),
        |(weighted, total), (index, level)| {
            let weight = LEAD_TIME_DECAY.powi(index as i32);
            (weighted + weight * level.score(), total + weight)
        },
    );

    ConfidenceLevel::clamped(weighted / total)
}

/// Re-score every daily bucket of a forecast, keeping the factors
#[must_use]
pub fn score_forecast_days(forecast: &AggregatedForecast) -> Vec<ConfidenceResult> {
    forecast
        .daily()
        .iter()
        .map(|day| score_consensus(&day.consensus))
        .collect()
}

/// Arithmetic mean of confidence scores, `None` for an empty list
#[must_use]
pub fn average_score(levels: &[ConfidenceLevel]) -> Option<f64> {
    if levels.is_empty() {
        return None;
    }
    Some(levels.iter().map(ConfidenceLevel::score).sum::<f64>() / levels.len() as f64)
}

fn spread_factor(std_dev: f64, ceiling: f64) -> f64 {
    1.0 - (std_dev / ceiling).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfidenceTier, ForecastModel, MetricStatistics};
    use approx::assert_abs_diff_eq;

    fn consensus(
        in_agreement: usize,
        outliers: usize,
        temperature_sd: f64,
        precipitation_sd: f64,
    ) -> ModelConsensus {
        let total = in_agreement + outliers;
        ModelConsensus {
            agreement_score: if total == 0 {
                0.0
            } else {
                in_agreement as f64 / total as f64
            },
            models_in_agreement: vec![ForecastModel::Ecmwf; in_agreement],
            outlier_models: vec![ForecastModel::Gfs; outliers],
            temperature: MetricStatistics {
                std_dev: temperature_sd,
                ..MetricStatistics::default()
            },
            precipitation: MetricStatistics {
                std_dev: precipitation_sd,
                ..MetricStatistics::default()
            },
            wind_speed: MetricStatistics::default(),
        }
    }

    #[test]
    fn test_perfect_agreement_is_high() {
        let result = score_consensus(&consensus(5, 0, 0.0, 0.0));
        assert_abs_diff_eq!(result.confidence.score(), 1.0, epsilon = 1e-12);
        assert_eq!(result.confidence.level(), ConfidenceTier::High);
        assert_eq!(result.factors.coverage, 1.0);
    }

    #[test]
    fn test_single_model_is_penalized_for_coverage() {
        let result = score_consensus(&consensus(1, 0, 0.0, 0.0));
        assert_abs_diff_eq!(result.confidence.score(), 0.8, epsilon = 1e-12);
        assert_eq!(result.confidence.level(), ConfidenceTier::High);
    }

    #[test]
    fn test_wide_spread_is_low() {
        let result = score_consensus(&consensus(6, 2, 8.0, 10.0));
        // 0.4 * 0.75 with both spread factors at zero
        assert_abs_diff_eq!(result.confidence.score(), 0.3, epsilon = 1e-12);
        assert_eq!(result.confidence.level(), ConfidenceTier::Low);
    }

    #[test]
    fn test_moderate_spread_is_medium() {
        let result = score_consensus(&consensus(3, 0, 2.0, 2.5));
        // 0.4 + 0.35 * 0.5 + 0.25 * 0.5
        assert_abs_diff_eq!(result.confidence.score(), 0.7, epsilon = 1e-12);
        let result = score_consensus(&consensus(3, 0, 3.0, 2.5));
        assert_eq!(result.confidence.level(), ConfidenceTier::Medium);
    }

    #[test]
    fn test_empty_bucket_scores_zero() {
        let result = score_consensus(&consensus(0, 0, 0.0, 0.0));
        assert_eq!(result.confidence.score(), 0.0);
    }

    #[test]
    fn test_overall_confidence_empty_is_neutral() {
        assert_eq!(overall_confidence(&[]), ConfidenceLevel::neutral());
    }

    #[test]
    fn test_overall_confidence_weights_early_buckets_more() {
        let levels = [
            ConfidenceLevel::from_score(0.9).unwrap(),
            ConfidenceLevel::from_score(0.1).unwrap(),
        ];
        let overall = overall_confidence(&levels);
        let expected = (0.9 + 0.95 * 0.1) / 1.95;
        assert_abs_diff_eq!(overall.score(), expected, epsilon = 1e-12);
        assert!(overall.score() > 0.5);
    }

    #[test]
    fn test_overall_confidence_of_uniform_scores() {
        let levels = vec![ConfidenceLevel::from_score(0.6).unwrap(); 10];
        assert_abs_diff_eq!(overall_confidence(&levels).score(), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_average_score() {
        assert_eq!(average_score(&[]), None);
        let levels = [
            ConfidenceLevel::from_score(0.2).unwrap(),
            ConfidenceLevel::from_score(0.4).unwrap(),
        ];
        assert_abs_diff_eq!(average_score(&levels).unwrap(), 0.3, epsilon = 1e-12);
    }
}
