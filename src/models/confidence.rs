//! Bounded confidence score with its derived label

use crate::error::ConsensusError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Score at or above which confidence is high
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.7;
/// Score at or above which confidence is medium
pub const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.4;

/// Three-level confidence label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    #[must_use]
    pub fn for_score(score: f64) -> Self {
        if score >= HIGH_CONFIDENCE_THRESHOLD {
            ConfidenceTier::High
        } else if score >= MEDIUM_CONFIDENCE_THRESHOLD {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceTier::High => write!(f, "high"),
            ConfidenceTier::Medium => write!(f, "medium"),
            ConfidenceTier::Low => write!(f, "low"),
        }
    }
}

/// A score in [0, 1] and the tier it maps to.
///
/// The tier is always derived from the score, so the pair can only be built
/// through [`ConfidenceLevel::from_score`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceLevel {
    level: ConfidenceTier,
    score: f64,
}

impl ConfidenceLevel {
    /// Build a confidence level, rejecting scores outside [0, 1]
    pub fn from_score(score: f64) -> crate::Result<Self> {
        if !(0.0..=1.0).contains(&score) {
            return Err(ConsensusError::validation(format!(
                "Confidence score must be within [0, 1], got {score}"
            )));
        }
        Ok(Self {
            level: ConfidenceTier::for_score(score),
            score,
        })
    }

    /// Build a confidence level from a raw score, clamping it into [0, 1]
    #[must_use]
    pub fn clamped(score: f64) -> Self {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        Self {
            level: ConfidenceTier::for_score(score),
            score,
        }
    }

    /// Medium confidence used when there is nothing to score
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            level: ConfidenceTier::Medium,
            score: 0.5,
        }
    }

    #[must_use]
    pub fn level(&self) -> ConfidenceTier {
        self.level
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = ConsensusError;

    fn try_from(score: f64) -> crate::Result<Self> {
        Self::from_score(score)
    }
}

impl<'de> Deserialize<'de> for ConfidenceLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // The serialized level is ignored and re-derived from the score
        #[derive(Deserialize)]
        struct Raw {
            score: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::from_score(raw.score).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0}%)", self.level, self.score * 100.0)
    }
}
