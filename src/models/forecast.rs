//! Raw per-model forecast as handed over by the fetch layer

use super::{Coordinates, DailyForecast, ForecastModel, WeatherMetrics};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One hourly reading of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyReading {
    pub timestamp: DateTime<Utc>,
    pub metrics: WeatherMetrics,
}

/// One model's complete forecast for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelForecast {
    pub model: ForecastModel,
    pub coordinates: Coordinates,
    /// When the model output was produced
    pub generated_at: DateTime<Utc>,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    /// Hourly readings, sorted by timestamp
    #[serde(default)]
    pub hourly: Vec<HourlyReading>,
    /// Daily summaries, sorted by date
    #[serde(default)]
    pub daily: Vec<DailyForecast>,
}

impl ModelForecast {
    /// Reading for an exact timestamp
    #[must_use]
    pub fn hourly_at(&self, timestamp: DateTime<Utc>) -> Option<&HourlyReading> {
        self.hourly.iter().find(|reading| reading.timestamp == timestamp)
    }

    /// Summary for a calendar day
    #[must_use]
    pub fn daily_on(&self, date: NaiveDate) -> Option<&DailyForecast> {
        self.daily.iter().find(|day| day.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_lookup_by_time_and_date() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let date = start.date_naive();
        let forecast = ModelForecast {
            model: ForecastModel::Icon,
            coordinates: Coordinates::new(50.0, 8.0),
            generated_at: start,
            valid_from: start,
            valid_to: start + chrono::Duration::days(1),
            hourly: vec![HourlyReading {
                timestamp: start,
                metrics: WeatherMetrics::basic(12.0, 0.0, 3.0, 0).unwrap(),
            }],
            daily: vec![DailyForecast::basic(date, 18.0, 9.0, 0.0, 5.0, 1).unwrap()],
        };

        assert!(forecast.hourly_at(start).is_some());
        assert!(forecast
            .hourly_at(start + chrono::Duration::hours(1))
            .is_none());
        assert_eq!(forecast.daily_on(date).unwrap().temperature_max.value(), 18.0);
        assert!(forecast.daily_on(date.succ_opt().unwrap()).is_none());
    }
}
