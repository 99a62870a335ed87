//! Consensus pipeline
//!
//! This module reduces independent model forecasts to a single consensus:
//! - Statistics kernel: mean, median, spread, trimmed mean, outliers
//! - Bucketing: hourly and daily grouping across models
//! - Consensus builder and metric aggregator per bucket
//! - Confidence scoring and model weighting
//! - The `aggregate` orchestrator tying them together

pub mod aggregator;
pub mod bucket;
pub mod builder;
pub mod confidence;
pub mod service;
pub mod statistics;
pub mod weighting;

pub use bucket::{DayKey, HourKey};
pub use confidence::{
    ConfidenceFactors, ConfidenceResult, overall_confidence, score_consensus, score_forecast_days,
};
pub use service::{aggregate, aggregate_with};
pub use statistics::Comparison;
pub use weighting::equal_weights;
