//! Aggregation orchestrator
//!
//! Builds the complete consensus forecast from a list of model forecasts in
//! one pass. Every bucket is computed independently from its own readings,
//! and buckets come out sorted by key.

use super::aggregator::{aggregate_daily, aggregate_hourly, daily_ranges, hourly_ranges};
use super::bucket::{BucketEntry, DayKey, HourKey, group_daily, group_hourly};
use super::builder::{ConsensusSample, build_consensus};
use super::confidence::{overall_confidence, score_consensus};
use super::weighting::equal_weights;
use crate::config::AggregationSettings;
use crate::error::ConsensusError;
use crate::models::{
    AggregatedDailyForecast, AggregatedForecast, AggregatedHourlyForecast, ConfidenceLevel,
    ConsensusForecast, DailyForecast, ForecastModel, ModelForecast, WeatherMetrics,
};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::{debug, info, instrument, warn};

/// Aggregate model forecasts with the default settings
pub fn aggregate(forecasts: Vec<ModelForecast>) -> crate::Result<AggregatedForecast> {
    aggregate_with(forecasts, &AggregationSettings::default())
}

/// Aggregate model forecasts into a consensus forecast.
///
/// Fails only when `forecasts` is empty.
#[instrument(skip_all, fields(models = forecasts.len()))]
pub fn aggregate_with(
    forecasts: Vec<ModelForecast>,
    settings: &AggregationSettings,
) -> crate::Result<AggregatedForecast> {
    let Some(first) = forecasts.first() else {
        return Err(ConsensusError::EmptyInput);
    };
    let coordinates = first.coordinates;
    let stated_window = (first.valid_from, first.valid_to);

    if forecasts.len() == 1 {
        warn!(model = %first.model, "Only one model available, consensus is trivial");
    }

    // BTreeMap iteration yields buckets in ascending key order
    let hourly: Vec<AggregatedHourlyForecast> = group_hourly(&forecasts)
        .into_iter()
        .map(|(key, entries)| aggregate_hour(key, &entries, settings))
        .collect();
    let daily: Vec<AggregatedDailyForecast> = group_daily(&forecasts)
        .into_iter()
        .map(|(key, entries)| aggregate_day(key, &entries, settings))
        .collect();

    let (valid_from, valid_to) = validity_window(&hourly, &daily).unwrap_or(stated_window);

    let generated_at = forecasts
        .iter()
        .map(|forecast| forecast.generated_at)
        .max()
        .unwrap_or(stated_window.0);

    let models: Vec<ForecastModel> = forecasts.iter().map(|f| f.model.clone()).collect();
    let model_weights = equal_weights(&models);

    let overall = if daily.is_empty() {
        let levels: Vec<ConfidenceLevel> = hourly.iter().map(|h| h.confidence).collect();
        overall_confidence(&levels)
    } else {
        let levels: Vec<ConfidenceLevel> = daily.iter().map(|d| d.confidence).collect();
        overall_confidence(&levels)
    };

    info!(
        hourly_buckets = hourly.len(),
        daily_buckets = daily.len(),
        overall_confidence = overall.score(),
        "Aggregated {} model forecasts at {}",
        models.len(),
        coordinates.format_coordinates()
    );

    Ok(AggregatedForecast {
        coordinates,
        generated_at,
        valid_from,
        valid_to,
        models,
        model_forecasts: forecasts,
        consensus: ConsensusForecast { hourly, daily },
        model_weights,
        overall_confidence: overall,
    })
}

fn aggregate_hour(
    key: HourKey,
    entries: &[BucketEntry<'_, WeatherMetrics>],
    settings: &AggregationSettings,
) -> AggregatedHourlyForecast {
    let samples: Vec<ConsensusSample<'_>> =
        entries.iter().map(ConsensusSample::from_hourly).collect();
    let consensus = build_consensus(&samples, settings.outlier_z_threshold);
    let confidence = score_consensus(&consensus).confidence;

    debug!(
        bucket = %key,
        models = entries.len(),
        agreement = consensus.agreement_score,
        outliers = consensus.outlier_models.len(),
        "Aggregated hourly bucket"
    );

    AggregatedHourlyForecast {
        timestamp: key.timestamp(),
        metrics: aggregate_hourly(entries, settings),
        confidence,
        consensus,
        ranges: hourly_ranges(entries),
    }
}

fn aggregate_day(
    key: DayKey,
    entries: &[BucketEntry<'_, DailyForecast>],
    settings: &AggregationSettings,
) -> AggregatedDailyForecast {
    let samples: Vec<ConsensusSample<'_>> =
        entries.iter().map(ConsensusSample::from_daily).collect();
    let consensus = build_consensus(&samples, settings.outlier_z_threshold);
    let confidence = score_consensus(&consensus).confidence;

    debug!(
        bucket = %key,
        models = entries.len(),
        agreement = consensus.agreement_score,
        outliers = consensus.outlier_models.len(),
        "Aggregated daily bucket"
    );

    AggregatedDailyForecast {
        date: key.date(),
        forecast: aggregate_daily(key.date(), entries, settings),
        confidence,
        consensus,
        ranges: daily_ranges(entries),
    }
}

/// Earliest and latest instant covered by the buckets. A day covers its UTC
/// midnight up to the following midnight.
fn validity_window(
    hourly: &[AggregatedHourlyForecast],
    daily: &[AggregatedDailyForecast],
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let spans = hourly
        .iter()
        .map(|hour| (hour.timestamp, hour.timestamp))
        .chain(daily.iter().map(|day| {
            let start = day.date.and_time(NaiveTime::MIN).and_utc();
            (start, start + Duration::days(1))
        }));

    spans.fold(None, |window, (start, end)| match window {
        None => Some((start, end)),
        Some((from, to)) => Some((from.min(start), to.max(end))),
    })
}
