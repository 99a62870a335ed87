//! Metric aggregator
//!
//! Collapses the readings of one bucket into a single representative value
//! per metric. Temperatures use a trimmed mean, gusty or categorical values
//! use the median and smooth fields use the arithmetic mean. Optional values
//! a model does not provide are left out instead of counted as zero.

use super::bucket::BucketEntry;
use super::statistics::{Comparison, ensemble_probability, mean, median, trimmed_mean};
use crate::config::AggregationSettings;
use crate::models::{
    Celsius, DailyForecast, DailyRanges, Hectopascals, HourlyRanges, Kilometers, MetersPerSecond,
    MetricRange, Millimeters, Percentage, Probability, UvIndex, WeatherCode, WeatherMetrics,
    WindDirection,
};
use chrono::NaiveDate;

/// Representative metrics of an hourly bucket
#[must_use]
pub fn aggregate_hourly(
    entries: &[BucketEntry<'_, WeatherMetrics>],
    settings: &AggregationSettings,
) -> WeatherMetrics {
    let temperature = collect(entries, |m| Some(m.temperature.value()));
    let feels_like = collect(entries, |m| Some(m.feels_like.value()));
    let precipitation = collect(entries, |m| Some(m.precipitation.value()));

    WeatherMetrics {
        temperature: Celsius::clamped(trimmed_mean(&temperature, settings.trim_fraction)),
        feels_like: Celsius::clamped(trimmed_mean(&feels_like, settings.trim_fraction)),
        humidity: percentage(&collect(entries, |m| Some(m.humidity.value()))),
        pressure: Hectopascals::clamped(mean(&collect(entries, |m| Some(m.pressure.value())))),
        wind_speed: MetersPerSecond::clamped(median(&collect(entries, |m| {
            Some(m.wind_speed.value())
        }))),
        wind_direction: mean_direction(&collect(entries, |m| Some(m.wind_direction.degrees()))),
        wind_gust: optional(&collect(entries, |m| m.wind_gust.map(f64::from)), median)
            .map(MetersPerSecond::clamped),
        precipitation: Millimeters::clamped(mean(&precipitation)),
        precipitation_probability: Some(precipitation_probability(&precipitation, settings)),
        cloud_cover: percentage(&collect(entries, |m| Some(m.cloud_cover.value()))),
        visibility: optional(&collect(entries, |m| m.visibility.map(f64::from)), mean)
            .map(Kilometers::clamped),
        uv_index: optional(&collect(entries, |m| m.uv_index.map(f64::from)), median)
            .map(UvIndex::clamped),
        weather_code: WeatherCode::from_estimate(median(&collect(entries, |m| {
            Some(f64::from(m.weather_code.code()))
        }))),
    }
}

/// Representative summary of a daily bucket
#[must_use]
pub fn aggregate_daily(
    date: NaiveDate,
    entries: &[BucketEntry<'_, DailyForecast>],
    settings: &AggregationSettings,
) -> DailyForecast {
    let precipitation = collect(entries, |d| Some(d.precipitation_sum.value()));

    DailyForecast {
        date,
        temperature_max: Celsius::clamped(trimmed_mean(
            &collect(entries, |d| Some(d.temperature_max.value())),
            settings.trim_fraction,
        )),
        temperature_min: Celsius::clamped(trimmed_mean(
            &collect(entries, |d| Some(d.temperature_min.value())),
            settings.trim_fraction,
        )),
        precipitation_sum: Millimeters::clamped(mean(&precipitation)),
        precipitation_probability: Some(precipitation_probability(&precipitation, settings)),
        wind_speed_max: MetersPerSecond::clamped(median(&collect(entries, |d| {
            Some(d.wind_speed_max.value())
        }))),
        wind_gust_max: optional(&collect(entries, |d| d.wind_gust_max.map(f64::from)), median)
            .map(MetersPerSecond::clamped),
        wind_direction_dominant: mean_direction(&collect(entries, |d| {
            Some(d.wind_direction_dominant.degrees())
        })),
        uv_index_max: optional(&collect(entries, |d| d.uv_index_max.map(f64::from)), median)
            .map(UvIndex::clamped),
        humidity_mean: optional(&collect(entries, |d| d.humidity_mean.map(f64::from)), mean)
            .map(|value| Percentage::clamped(value.round())),
        pressure_mean: optional(&collect(entries, |d| d.pressure_mean.map(f64::from)), mean)
            .map(Hectopascals::clamped),
        cloud_cover_mean: optional(
            &collect(entries, |d| d.cloud_cover_mean.map(f64::from)),
            mean,
        )
        .map(|value| Percentage::clamped(value.round())),
        weather_code: WeatherCode::from_estimate(median(&collect(entries, |d| {
            Some(f64::from(d.weather_code.code()))
        }))),
    }
}

/// Min/max of the consensus metrics across the models of an hourly bucket
#[must_use]
pub fn hourly_ranges(entries: &[BucketEntry<'_, WeatherMetrics>]) -> HourlyRanges {
    HourlyRanges {
        temperature: range(entries, |m| m.temperature.value()),
        precipitation: range(entries, |m| m.precipitation.value()),
        wind_speed: range(entries, |m| m.wind_speed.value()),
    }
}

/// Min/max of the key metrics across the models of a daily bucket
#[must_use]
pub fn daily_ranges(entries: &[BucketEntry<'_, DailyForecast>]) -> DailyRanges {
    DailyRanges {
        temperature_max: range(entries, |d| d.temperature_max.value()),
        temperature_min: range(entries, |d| d.temperature_min.value()),
        precipitation: range(entries, |d| d.precipitation_sum.value()),
        wind_speed: range(entries, |d| d.wind_speed_max.value()),
    }
}

fn collect<T>(entries: &[BucketEntry<'_, T>], value: impl Fn(&T) -> Option<f64>) -> Vec<f64> {
    entries.iter().filter_map(|entry| value(entry.reading)).collect()
}

fn range<T>(entries: &[BucketEntry<'_, T>], value: impl Fn(&T) -> f64) -> MetricRange {
    MetricRange::from_values(&collect(entries, |reading| Some(value(reading))))
}

/// Apply an estimator only when at least one model provided the value
fn optional(values: &[f64], estimator: fn(&[f64]) -> f64) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(estimator(values))
    }
}

fn percentage(values: &[f64]) -> Percentage {
    Percentage::clamped(mean(values).round())
}

/// Arithmetic mean of raw degrees, wrapped into [0, 360).
///
/// This does not average on the circle: 350° and 10° give 180°.
fn mean_direction(values: &[f64]) -> WindDirection {
    WindDirection::normalized(mean(values))
}

/// Fraction of models with measurable precipitation
fn precipitation_probability(amounts: &[f64], settings: &AggregationSettings) -> Probability {
    Probability::clamped(
        ensemble_probability(amounts, settings.precipitation_threshold_mm, Comparison::Greater)
            / 100.0,
    )
}
