//! Validated physical quantities
//!
//! Each quantity is an opaque wrapper around `f64` that can only be built
//! through a checking constructor, so a value held by any of these types is
//! always inside its physical range. Deserialization goes through the same
//! constructors.

use crate::error::ConsensusError;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! bounded_quantity {
    ($(#[$meta:meta])* $name:ident, unit = $unit:literal, min = $min:expr, max = $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
        #[serde(try_from = "f64", into = "f64")]
        pub struct $name(f64);

        impl $name {
            /// Smallest representable value
            pub const MIN: f64 = $min;
            /// Largest representable value
            pub const MAX: f64 = $max;

            /// Build a value, rejecting non-finite or out-of-range input
            pub fn new(value: f64) -> crate::Result<Self> {
                if !value.is_finite() || value < Self::MIN || value > Self::MAX {
                    return Err(ConsensusError::validation(format!(
                        "{} must be within [{}, {}], got {}",
                        stringify!($name),
                        Self::MIN,
                        Self::MAX,
                        value
                    )));
                }
                Ok(Self(value))
            }

            /// Build a value, clamping it into range. NaN maps to the minimum.
            #[must_use]
            pub fn clamped(value: f64) -> Self {
                if value.is_nan() {
                    return Self(Self::MIN);
                }
                Self(value.clamp(Self::MIN, Self::MAX))
            }

            #[must_use]
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl TryFrom<f64> for $name {
            type Error = ConsensusError;

            fn try_from(value: f64) -> crate::Result<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(quantity: $name) -> f64 {
                quantity.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.1}{}", self.0, $unit)
            }
        }
    };
}

bounded_quantity!(
    /// Air temperature in degrees Celsius (not below absolute zero)
    Celsius,
    unit = "°C",
    min = -273.15,
    max = f64::MAX
);

bounded_quantity!(
    /// Percentage in [0, 100], used for relative humidity and cloud cover
    Percentage,
    unit = "%",
    min = 0.0,
    max = 100.0
);

bounded_quantity!(
    /// Atmospheric pressure in hPa
    Hectopascals,
    unit = " hPa",
    min = 0.0,
    max = f64::MAX
);

bounded_quantity!(
    /// Precipitation amount in millimeters
    Millimeters,
    unit = " mm",
    min = 0.0,
    max = f64::MAX
);

bounded_quantity!(
    /// Wind speed or gust in m/s
    MetersPerSecond,
    unit = " m/s",
    min = 0.0,
    max = f64::MAX
);

bounded_quantity!(
    /// Visibility in kilometers
    Kilometers,
    unit = " km",
    min = 0.0,
    max = f64::MAX
);

bounded_quantity!(
    /// UV index
    UvIndex,
    unit = "",
    min = 0.0,
    max = f64::MAX
);

bounded_quantity!(
    /// Probability as a fraction in [0, 1]
    Probability,
    unit = "",
    min = 0.0,
    max = 1.0
);

impl Probability {
    /// Probability expressed as a whole percentage (0-100)
    #[must_use]
    pub fn as_percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

/// Wind direction in degrees from north, always normalized into [0, 360)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct WindDirection(f64);

impl WindDirection {
    /// Build a direction, wrapping any finite angle into [0, 360)
    pub fn new(degrees: f64) -> crate::Result<Self> {
        if !degrees.is_finite() {
            return Err(ConsensusError::validation(format!(
                "WindDirection must be finite, got {degrees}"
            )));
        }
        Ok(Self::normalized(degrees))
    }

    /// Wrap a finite angle into [0, 360). NaN maps to north.
    #[must_use]
    pub fn normalized(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return Self(0.0);
        }
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if wrapped >= 360.0 { Self(0.0) } else { Self(wrapped) }
    }

    #[must_use]
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Convert wind direction to a 16-point compass name
    #[must_use]
    pub fn cardinal(self) -> &'static str {
        const POINTS: [&str; 16] = [
            "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
            "NW", "NNW",
        ];
        let index = ((self.0 + 11.25) / 22.5).floor() as usize % POINTS.len();
        POINTS[index]
    }
}

impl TryFrom<f64> for WindDirection {
    type Error = ConsensusError;

    fn try_from(degrees: f64) -> crate::Result<Self> {
        Self::new(degrees)
    }
}

impl From<WindDirection> for f64 {
    fn from(direction: WindDirection) -> f64 {
        direction.0
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}° {}", self.0, self.cardinal())
    }
}
