//! Weather metric vectors for a single instant and a single day

use super::units::{
    Celsius, Hectopascals, Kilometers, MetersPerSecond, Millimeters, Percentage, Probability,
    UvIndex, WindDirection,
};
use super::weather_code::WeatherCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Physical conditions at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherMetrics {
    /// Air temperature at 2 m
    pub temperature: Celsius,
    /// Apparent temperature
    pub feels_like: Celsius,
    /// Relative humidity
    pub humidity: Percentage,
    /// Surface pressure
    pub pressure: Hectopascals,
    /// Wind speed at 10 m
    pub wind_speed: MetersPerSecond,
    /// Wind direction at 10 m
    pub wind_direction: WindDirection,
    /// Wind gusts at 10 m, when the model provides them
    #[serde(default)]
    pub wind_gust: Option<MetersPerSecond>,
    /// Precipitation amount for the hour
    pub precipitation: Millimeters,
    /// Chance of precipitation, when the model provides it
    #[serde(default)]
    pub precipitation_probability: Option<Probability>,
    /// Total cloud cover
    pub cloud_cover: Percentage,
    #[serde(default)]
    pub visibility: Option<Kilometers>,
    #[serde(default)]
    pub uv_index: Option<UvIndex>,
    pub weather_code: WeatherCode,
}

impl WeatherMetrics {
    /// Build a metric vector from the three consensus metrics, filling the
    /// rest with neutral values (50 % humidity, standard pressure, calm sky).
    pub fn basic(
        temperature: f64,
        precipitation: f64,
        wind_speed: f64,
        weather_code: u8,
    ) -> crate::Result<Self> {
        let temperature = Celsius::new(temperature)?;
        Ok(Self {
            temperature,
            feels_like: temperature,
            humidity: Percentage::new(50.0)?,
            pressure: Hectopascals::new(1013.25)?,
            wind_speed: MetersPerSecond::new(wind_speed)?,
            wind_direction: WindDirection::new(0.0)?,
            wind_gust: None,
            precipitation: Millimeters::new(precipitation)?,
            precipitation_probability: None,
            cloud_cover: Percentage::new(0.0)?,
            visibility: None,
            uv_index: None,
            weather_code: WeatherCode::new(weather_code)?,
        })
    }
}

/// Summary of one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temperature_max: Celsius,
    pub temperature_min: Celsius,
    /// Total precipitation for the day
    pub precipitation_sum: Millimeters,
    #[serde(default)]
    pub precipitation_probability: Option<Probability>,
    pub wind_speed_max: MetersPerSecond,
    #[serde(default)]
    pub wind_gust_max: Option<MetersPerSecond>,
    pub wind_direction_dominant: WindDirection,
    #[serde(default)]
    pub uv_index_max: Option<UvIndex>,
    /// Daily mean relative humidity
    #[serde(default)]
    pub humidity_mean: Option<Percentage>,
    /// Daily mean surface pressure
    #[serde(default)]
    pub pressure_mean: Option<Hectopascals>,
    /// Daily mean cloud cover
    #[serde(default)]
    pub cloud_cover_mean: Option<Percentage>,
    pub weather_code: WeatherCode,
}

impl DailyForecast {
    /// Build a day summary from its key metrics, leaving optional fields empty
    pub fn basic(
        date: NaiveDate,
        temperature_max: f64,
        temperature_min: f64,
        precipitation_sum: f64,
        wind_speed_max: f64,
        weather_code: u8,
    ) -> crate::Result<Self> {
        Ok(Self {
            date,
            temperature_max: Celsius::new(temperature_max)?,
            temperature_min: Celsius::new(temperature_min)?,
            precipitation_sum: Millimeters::new(precipitation_sum)?,
            precipitation_probability: None,
            wind_speed_max: MetersPerSecond::new(wind_speed_max)?,
            wind_gust_max: None,
            wind_direction_dominant: WindDirection::new(0.0)?,
            uv_index_max: None,
            humidity_mean: None,
            pressure_mean: None,
            cloud_cover_mean: None,
            weather_code: WeatherCode::new(weather_code)?,
        })
    }
}
