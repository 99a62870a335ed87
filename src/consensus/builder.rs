//! Consensus builder
//!
//! Partitions the models of one bucket into those in agreement and outliers.
//! A model whose temperature, precipitation or wind speed has a z-score above
//! the threshold is an outlier for the whole bucket.

use super::bucket::BucketEntry;
use super::statistics::{find_outlier_indices, metric_statistics};
use crate::models::{DailyForecast, ForecastModel, ModelConsensus, WeatherMetrics};
use std::collections::BTreeSet;

/// The three consensus metrics of one model in one bucket
#[derive(Debug, Clone, Copy)]
pub struct ConsensusSample<'a> {
    pub model: &'a ForecastModel,
    pub temperature: f64,
    pub precipitation: f64,
    pub wind_speed: f64,
}

impl<'a> ConsensusSample<'a> {
    #[must_use]
    pub fn from_hourly(entry: &BucketEntry<'a, WeatherMetrics>) -> Self {
        Self {
            model: entry.model,
            temperature: entry.reading.temperature.value(),
            precipitation: entry.reading.precipitation.value(),
            wind_speed: entry.reading.wind_speed.value(),
        }
    }

    /// Daily buckets compare the day's maximum temperature, precipitation
    /// total and maximum wind speed
    #[must_use]
    pub fn from_daily(entry: &BucketEntry<'a, DailyForecast>) -> Self {
        Self {
            model: entry.model,
            temperature: entry.reading.temperature_max.value(),
            precipitation: entry.reading.precipitation_sum.value(),
            wind_speed: entry.reading.wind_speed_max.value(),
        }
    }
}

/// Build the consensus of one bucket
#[must_use]
pub fn build_consensus(samples: &[ConsensusSample<'_>], outlier_threshold: f64) -> ModelConsensus {
    let temperatures: Vec<f64> = samples.iter().map(|s| s.temperature).collect();
    let precipitation: Vec<f64> = samples.iter().map(|s| s.precipitation).collect();
    let wind_speeds: Vec<f64> = samples.iter().map(|s| s.wind_speed).collect();

    let outlier_indices: BTreeSet<usize> = [&temperatures, &precipitation, &wind_speeds]
        .into_iter()
        .flat_map(|values| find_outlier_indices(values, outlier_threshold))
        .collect();

    let (outliers, agreeing): (Vec<_>, Vec<_>) = samples
        .iter()
        .enumerate()
        .partition(|(index, _)| outlier_indices.contains(index));

    let agreement_score = if samples.is_empty() {
        0.0
    } else {
        agreeing.len() as f64 / samples.len() as f64
    };

    ModelConsensus {
        agreement_score,
        models_in_agreement: agreeing.into_iter().map(|(_, s)| s.model.clone()).collect(),
        outlier_models: outliers.into_iter().map(|(_, s)| s.model.clone()).collect(),
        temperature: metric_statistics(&temperatures),
        precipitation: metric_statistics(&precipitation),
        wind_speed: metric_statistics(&wind_speeds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::statistics::DEFAULT_OUTLIER_THRESHOLD;

    static MODELS: [ForecastModel; 8] = [
        ForecastModel::Ecmwf,
        ForecastModel::Gfs,
        ForecastModel::Icon,
        ForecastModel::MeteoFrance,
        ForecastModel::Ukmo,
        ForecastModel::Jma,
        ForecastModel::Gem,
        ForecastModel::Ecmwf,
    ];

    fn samples(values: &[(f64, f64, f64)]) -> Vec<ConsensusSample<'static>> {
        values
            .iter()
            .zip(MODELS.iter())
            .map(|(&(temperature, precipitation, wind_speed), model)| ConsensusSample {
                model,
                temperature,
                precipitation,
                wind_speed,
            })
            .collect()
    }

    #[test]
    fn test_empty_bucket() {
        let consensus = build_consensus(&[], DEFAULT_OUTLIER_THRESHOLD);
        assert_eq!(consensus.agreement_score, 0.0);
        assert!(consensus.models_in_agreement.is_empty());
        assert!(consensus.outlier_models.is_empty());
    }

    #[test]
    fn test_single_model_agrees_with_itself() {
        let consensus = build_consensus(&samples(&[(12.0, 0.4, 3.0)]), DEFAULT_OUTLIER_THRESHOLD);
        assert_eq!(consensus.agreement_score, 1.0);
        assert_eq!(consensus.models_in_agreement, vec![ForecastModel::Ecmwf]);
        assert!(consensus.outlier_models.is_empty());
        assert_eq!(consensus.temperature.mean, 12.0);
    }

    #[test]
    fn test_outlier_in_any_metric_flags_the_model() {
        // Six models agree; the seventh (GEM) is far off in wind speed only
        let consensus = build_consensus(
            &samples(&[
                (15.0, 0.0, 3.0),
                (15.0, 0.0, 3.0),
                (15.0, 0.0, 3.0),
                (15.0, 0.0, 3.0),
                (15.0, 0.0, 3.0),
                (15.0, 0.0, 3.0),
                (15.0, 0.0, 30.0),
            ]),
            DEFAULT_OUTLIER_THRESHOLD,
        );

        assert_eq!(consensus.outlier_models, vec![ForecastModel::Gem]);
        assert_eq!(consensus.models_in_agreement.len(), 6);
        assert_eq!(consensus.model_count(), 7);
        assert!((consensus.agreement_score - 6.0 / 7.0).abs() < 1e-12);
        assert_eq!(consensus.wind_speed.max, 30.0);
        assert_eq!(consensus.temperature.std_dev, 0.0);
    }

    #[test]
    fn test_three_models_cannot_produce_an_outlier() {
        // With three values the largest possible z-score is sqrt(2)
        let consensus = build_consensus(
            &samples(&[(10.0, 0.0, 2.0), (10.0, 0.0, 2.0), (40.0, 25.0, 20.0)]),
            DEFAULT_OUTLIER_THRESHOLD,
        );
        assert!(consensus.outlier_models.is_empty());
        assert_eq!(consensus.agreement_score, 1.0);
    }

    #[test]
    fn test_partition_covers_every_model() {
        let consensus = build_consensus(
            &samples(&[
                (10.0, 0.0, 2.0),
                (10.0, 0.0, 2.0),
                (10.0, 0.0, 2.0),
                (10.0, 0.0, 2.0),
                (10.0, 0.0, 2.0),
                (10.0, 0.0, 2.0),
                (10.0, 12.0, 2.0),
                (25.0, 0.0, 2.0),
            ]),
            DEFAULT_OUTLIER_THRESHOLD,
        );
        assert_eq!(consensus.model_count(), 8);
        assert_eq!(consensus.outlier_models.len(), 2);
        assert_eq!(consensus.agreement_score, 0.75);
    }
}
