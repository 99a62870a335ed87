//! Consensus output types

use super::{
    ConfidenceLevel, Coordinates, DailyForecast, ForecastModel, ModelForecast, WeatherMetrics,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Summary statistics of one metric across the models of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricStatistics {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// `max - min`
    pub range: f64,
}

impl MetricStatistics {
    /// Z-score of a value against these statistics, 0 when there is no spread
    #[must_use]
    pub fn z_score(&self, value: f64) -> f64 {
        if self.std_dev > 0.0 {
            (value - self.mean) / self.std_dev
        } else {
            0.0
        }
    }
}

/// Lowest and highest value of a metric across contributing models
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    /// Range of a set of values; zero for empty input
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self { min, max }
    }

    #[must_use]
    pub fn spread(&self) -> f64 {
        self.max - self.min
    }
}

/// Agreement between the models of one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConsensus {
    /// Share of contributing models that are not outliers, in [0, 1]
    pub agreement_score: f64,
    pub models_in_agreement: Vec<ForecastModel>,
    pub outlier_models: Vec<ForecastModel>,
    pub temperature: MetricStatistics,
    pub precipitation: MetricStatistics,
    pub wind_speed: MetricStatistics,
}

impl ModelConsensus {
    /// Number of models that contributed to the bucket
    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models_in_agreement.len() + self.outlier_models.len()
    }

    #[must_use]
    pub fn is_outlier(&self, model: &ForecastModel) -> bool {
        self.outlier_models.contains(model)
    }
}

/// Per-metric spread of an hourly bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyRanges {
    pub temperature: MetricRange,
    pub precipitation: MetricRange,
    pub wind_speed: MetricRange,
}

/// Per-metric spread of a daily bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRanges {
    pub temperature_max: MetricRange,
    pub temperature_min: MetricRange,
    pub precipitation: MetricRange,
    pub wind_speed: MetricRange,
}

/// Consensus for one hourly timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedHourlyForecast {
    pub timestamp: DateTime<Utc>,
    pub metrics: WeatherMetrics,
    pub confidence: ConfidenceLevel,
    pub consensus: ModelConsensus,
    pub ranges: HourlyRanges,
}

/// Consensus for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedDailyForecast {
    pub date: NaiveDate,
    pub forecast: DailyForecast,
    pub confidence: ConfidenceLevel,
    pub consensus: ModelConsensus,
    pub ranges: DailyRanges,
}

/// Contribution of a model to the consensus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelWeight {
    pub model: ForecastModel,
    /// Weight in (0, 1]; all weights of a forecast sum to 1
    pub weight: f64,
    pub reason: String,
}

/// Hourly and daily consensus buckets, each sorted ascending
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsensusForecast {
    pub hourly: Vec<AggregatedHourlyForecast>,
    pub daily: Vec<AggregatedDailyForecast>,
}

/// Complete multi-model consensus forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedForecast {
    pub coordinates: Coordinates,
    /// Latest generation time among the contributing model runs
    pub generated_at: DateTime<Utc>,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub models: Vec<ForecastModel>,
    /// Raw per-model forecasts, kept for drill-down
    pub model_forecasts: Vec<ModelForecast>,
    pub consensus: ConsensusForecast,
    pub model_weights: Vec<ModelWeight>,
    pub overall_confidence: ConfidenceLevel,
}

impl AggregatedForecast {
    #[must_use]
    pub fn hourly(&self) -> &[AggregatedHourlyForecast] {
        &self.consensus.hourly
    }

    #[must_use]
    pub fn daily(&self) -> &[AggregatedDailyForecast] {
        &self.consensus.daily
    }

    /// Confidence of every daily bucket, in date order
    #[must_use]
    pub fn daily_confidences(&self) -> Vec<ConfidenceLevel> {
        self.consensus.daily.iter().map(|day| day.confidence).collect()
    }

    /// Confidence of every hourly bucket, in time order
    #[must_use]
    pub fn hourly_confidences(&self) -> Vec<ConfidenceLevel> {
        self.consensus.hourly.iter().map(|hour| hour.confidence).collect()
    }

    /// The raw forecast of a contributing model
    #[must_use]
    pub fn model_forecast(&self, model: &ForecastModel) -> Option<&ModelForecast> {
        self.model_forecasts.iter().find(|forecast| &forecast.model == model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_range() {
        let range = MetricRange::from_values(&[3.0, -1.0, 7.5]);
        assert_eq!(range.min, -1.0);
        assert_eq!(range.max, 7.5);
        assert_eq!(range.spread(), 8.5);
        assert_eq!(MetricRange::from_values(&[]), MetricRange::default());
    }

    #[test]
    fn test_z_score_without_spread() {
        let stats = MetricStatistics {
            mean: 10.0,
            median: 10.0,
            min: 10.0,
            max: 10.0,
            std_dev: 0.0,
            range: 0.0,
        };
        assert_eq!(stats.z_score(25.0), 0.0);
    }
}
