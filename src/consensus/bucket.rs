//! Bucket keys and grouping of per-model readings
//!
//! Hourly readings share a bucket only when their timestamps denote the same
//! instant; daily readings share a bucket when they carry the same calendar
//! date. Readings that are misaligned by even a minute stay in separate
//! buckets. Aligning model output is the fetch layer's job.

use crate::models::{DailyForecast, ForecastModel, ModelForecast, WeatherMetrics};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Key of an hourly bucket, equal only for identical instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HourKey(DateTime<Utc>);

/// Key of a daily bucket, the forecast's calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DayKey(NaiveDate);

impl HourKey {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self(timestamp)
    }

    #[must_use]
    pub fn timestamp(self) -> DateTime<Utc> {
        self.0
    }
}

impl DayKey {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    #[must_use]
    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for HourKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// One model's reading inside a bucket
#[derive(Debug, Clone, Copy)]
pub struct BucketEntry<'a, T> {
    pub model: &'a ForecastModel,
    pub reading: &'a T,
}

/// Hourly readings of all models, keyed by timestamp in ascending order.
/// Within a bucket, entries keep the order of `forecasts`.
#[must_use]
pub fn group_hourly(
    forecasts: &[ModelForecast],
) -> BTreeMap<HourKey, Vec<BucketEntry<'_, WeatherMetrics>>> {
    let mut buckets: BTreeMap<HourKey, Vec<BucketEntry<'_, WeatherMetrics>>> = BTreeMap::new();
    for forecast in forecasts {
        for reading in &forecast.hourly {
            buckets
                .entry(HourKey::new(reading.timestamp))
                .or_default()
                .push(BucketEntry {
                    model: &forecast.model,
                    reading: &reading.metrics,
                });
        }
    }
    buckets
}

/// Daily summaries of all models, keyed by date in ascending order.
/// Within a bucket, entries keep the order of `forecasts`.
#[must_use]
pub fn group_daily(
    forecasts: &[ModelForecast],
) -> BTreeMap<DayKey, Vec<BucketEntry<'_, DailyForecast>>> {
    let mut buckets: BTreeMap<DayKey, Vec<BucketEntry<'_, DailyForecast>>> = BTreeMap::new();
    for forecast in forecasts {
        for day in &forecast.daily {
            buckets
                .entry(DayKey::new(day.date))
                .or_default()
                .push(BucketEntry {
                    model: &forecast.model,
                    reading: day,
                });
        }
    }
    buckets
}
