//! `weather-consensus` - Multi-model weather forecast consensus
//!
//! This library merges forecasts from several numerical weather models into
//! one consensus forecast, scores how far the models can be trusted, and
//! describes the result in plain language.

pub mod config;
pub mod consensus;
pub mod error;
pub mod models;
pub mod narrative;
pub mod telemetry;

// Re-export core types for public API
pub use config::{AggregationSettings, ConsensusConfig, NarrativeSettings};
pub use consensus::{aggregate, aggregate_with, overall_confidence, score_forecast_days};
pub use error::ConsensusError;
pub use models::{AggregatedForecast, ConfidenceLevel, ForecastModel, ModelForecast};
pub use narrative::{NarrativeBuilder, NarrativeSummary, NarrativeType, build_narrative};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ConsensusError>;
