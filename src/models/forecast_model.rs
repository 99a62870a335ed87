//! Identifiers of the numerical weather-prediction models

use serde::{Deserialize, Serialize};
use std::fmt;

/// A numerical weather-prediction model contributing a forecast
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastModel {
    /// ECMWF Integrated Forecasting System
    Ecmwf,
    /// NOAA Global Forecast System
    Gfs,
    /// DWD ICON
    Icon,
    /// Météo-France ARPEGE
    MeteoFrance,
    /// UK Met Office Unified Model
    Ukmo,
    /// Japan Meteorological Agency GSM
    Jma,
    /// Environment Canada GEM
    Gem,
    /// Any other model, identified by name
    Other(String),
}

impl ForecastModel {
    /// Short name used in narrative text
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            ForecastModel::Ecmwf => "ECMWF",
            ForecastModel::Gfs => "GFS",
            ForecastModel::Icon => "ICON",
            ForecastModel::MeteoFrance => "Météo-France",
            ForecastModel::Ukmo => "UKMO",
            ForecastModel::Jma => "JMA",
            ForecastModel::Gem => "GEM",
            ForecastModel::Other(name) => name,
        }
    }
}

impl fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
