//! WMO weather interpretation codes

use crate::error::ConsensusError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Codes defined by the WMO 4677 subset used by numerical-model APIs
const KNOWN_CODES: [u8; 28] = [
    0, 1, 2, 3, 45, 48, 51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 71, 73, 75, 77, 80, 81, 82, 85,
    86, 95, 96, 99,
];

/// A recognized WMO weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeatherCode(u8);

/// Coarse weather condition used for narrative wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionCategory {
    Clear,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Showers,
    Thunderstorm,
}

impl WeatherCode {
    pub const CLEAR_SKY: WeatherCode = WeatherCode(0);

    /// Build a code, rejecting values outside the WMO table
    pub fn new(code: u8) -> crate::Result<Self> {
        if KNOWN_CODES.contains(&code) {
            Ok(Self(code))
        } else {
            Err(ConsensusError::validation(format!(
                "Unknown WMO weather code {code}"
            )))
        }
    }

    /// Round a central-tendency estimate to the nearest integer code,
    /// falling back to clear sky when the result is not a recognized code.
    #[must_use]
    pub fn from_estimate(value: f64) -> Self {
        let rounded = value.round();
        if (0.0..=f64::from(u8::MAX)).contains(&rounded) {
            if let Ok(code) = Self::new(rounded as u8) {
                return code;
            }
        }
        warn!(estimate = value, "Weather code estimate is not a WMO code, using clear sky");
        Self::CLEAR_SKY
    }

    #[must_use]
    pub fn code(self) -> u8 {
        self.0
    }

    /// Convert weather code to human-readable description
    #[must_use]
    pub fn description(self) -> &'static str {
        match self.0 {
            0 => "Clear sky",
            1 => "Mainly clear",
            2 => "Partly cloudy",
            3 => "Overcast",
            45 => "Fog",
            48 => "Depositing rime fog",
            51 => "Light drizzle",
            53 => "Moderate drizzle",
            55 => "Dense drizzle",
            56 => "Light freezing drizzle",
            57 => "Dense freezing drizzle",
            61 => "Slight rain",
            63 => "Moderate rain",
            65 => "Heavy rain",
            66 => "Light freezing rain",
            67 => "Heavy freezing rain",
            71 => "Slight snow fall",
            73 => "Moderate snow fall",
            75 => "Heavy snow fall",
            77 => "Snow grains",
            80 => "Slight rain showers",
            81 => "Moderate rain showers",
            82 => "Violent rain showers",
            85 => "Slight snow showers",
            86 => "Heavy snow showers",
            95 => "Thunderstorm",
            96 => "Thunderstorm with slight hail",
            _ => "Thunderstorm with heavy hail",
        }
    }

    #[must_use]
    pub fn category(self) -> ConditionCategory {
        match self.0 {
            0 | 1 => ConditionCategory::Clear,
            2 | 3 => ConditionCategory::Cloudy,
            45 | 48 => ConditionCategory::Fog,
            51..=57 => ConditionCategory::Drizzle,
            61..=67 => ConditionCategory::Rain,
            71..=77 | 85 | 86 => ConditionCategory::Snow,
            80..=82 => ConditionCategory::Showers,
            _ => ConditionCategory::Thunderstorm,
        }
    }

    /// Whether the code describes falling precipitation
    #[must_use]
    pub fn is_wet(self) -> bool {
        self.category().is_wet()
    }
}

impl ConditionCategory {
    #[must_use]
    pub fn is_wet(self) -> bool {
        !matches!(
            self,
            ConditionCategory::Clear | ConditionCategory::Cloudy | ConditionCategory::Fog
        )
    }

    /// Lowercase phrase used inside narrative sentences
    #[must_use]
    pub fn phrase(self) -> &'static str {
        match self {
            ConditionCategory::Clear => "clear skies",
            ConditionCategory::Cloudy => "cloudy skies",
            ConditionCategory::Fog => "fog",
            ConditionCategory::Drizzle => "drizzle",
            ConditionCategory::Rain => "rain",
            ConditionCategory::Snow => "snow",
            ConditionCategory::Showers => "showers",
            ConditionCategory::Thunderstorm => "thunderstorms",
        }
    }
}

impl Default for WeatherCode {
    fn default() -> Self {
        Self::CLEAR_SKY
    }
}

impl TryFrom<u8> for WeatherCode {
    type Error = ConsensusError;

    fn try_from(code: u8) -> crate::Result<Self> {
        Self::new(code)
    }
}

impl From<WeatherCode> for u8 {
    fn from(code: WeatherCode) -> u8 {
        code.0
    }
}

impl fmt::Display for WeatherCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
