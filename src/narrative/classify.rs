//! Narrative classification

use crate::models::AggregatedForecast;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which story the narrative tells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeType {
    /// Models broadly agree and conditions stay the same
    Agreement,
    /// Average confidence is too low to tell a single story
    Disagreement,
    /// The first and last day differ between dry and wet
    Transition,
}

impl fmt::Display for NarrativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NarrativeType::Agreement => write!(f, "agreement"),
            NarrativeType::Disagreement => write!(f, "disagreement"),
            NarrativeType::Transition => write!(f, "transition"),
        }
    }
}

/// Classify a forecast. Low confidence wins over a dry/wet change, which
/// wins over agreement.
#[must_use]
pub fn classify(
    forecast: &AggregatedForecast,
    average_confidence: f64,
    low_confidence_threshold: f64,
) -> NarrativeType {
    if average_confidence < low_confidence_threshold {
        return NarrativeType::Disagreement;
    }

    let daily = forecast.daily();
    if let (Some(first), Some(last)) = (daily.first(), daily.last()) {
        if daily.len() >= 2
            && first.forecast.weather_code.is_wet() != last.forecast.weather_code.is_wet()
        {
            return NarrativeType::Transition;
        }
    }

    NarrativeType::Agreement
}
