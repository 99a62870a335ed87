//! Data models for the consensus pipeline
//!
//! This module contains the core domain models organized by concern:
//! - Units: validated physical quantities
//! - Weather codes: WMO condition codes and categories
//! - Metrics and forecasts: raw per-model input
//! - Confidence and aggregated: consensus output

pub mod aggregated;
pub mod confidence;
pub mod forecast;
pub mod forecast_model;
pub mod location;
pub mod metrics;
pub mod units;
pub mod weather_code;

// Re-export all public types for convenient access
pub use aggregated::{
    AggregatedDailyForecast, AggregatedForecast, AggregatedHourlyForecast, ConsensusForecast,
    DailyRanges, HourlyRanges, MetricRange, MetricStatistics, ModelConsensus, ModelWeight,
};
pub use confidence::{ConfidenceLevel, ConfidenceTier};
pub use forecast::{HourlyReading, ModelForecast};
pub use forecast_model::ForecastModel;
pub use location::Coordinates;
pub use metrics::{DailyForecast, WeatherMetrics};
pub use units::{
    Celsius, Hectopascals, Kilometers, MetersPerSecond, Millimeters, Percentage, Probability,
    UvIndex, WindDirection,
};
pub use weather_code::{ConditionCategory, WeatherCode};
