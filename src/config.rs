//! Configuration management for the consensus pipeline
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ConsensusError;
use crate::consensus::statistics::{DEFAULT_OUTLIER_THRESHOLD, DEFAULT_TRIM_FRACTION};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Aggregation tuning
    #[serde(default)]
    pub aggregation: AggregationSettings,
    /// Narrative tuning
    #[serde(default)]
    pub narrative: NarrativeSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings of the consensus builder and metric aggregator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregationSettings {
    /// Z-score above which a model is an outlier
    #[serde(default = "default_outlier_z_threshold")]
    pub outlier_z_threshold: f64,
    /// Share trimmed from each end for trimmed-mean metrics
    #[serde(default = "default_trim_fraction")]
    pub trim_fraction: f64,
    /// Precipitation above which a model counts as "wet" (mm)
    #[serde(default = "default_precipitation_threshold")]
    pub precipitation_threshold_mm: f64,
}

/// Settings of the narrative synthesizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSettings {
    /// Lead time in days from which an uncertainty alert is raised
    #[serde(default = "default_uncertainty_horizon")]
    pub uncertainty_horizon_days: u32,
    /// Average confidence below which models are considered in disagreement
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_outlier_z_threshold() -> f64 {
    DEFAULT_OUTLIER_THRESHOLD
}

fn default_trim_fraction() -> f64 {
    DEFAULT_TRIM_FRACTION
}

fn default_precipitation_threshold() -> f64 {
    0.1
}

fn default_uncertainty_horizon() -> u32 {
    5
}

fn default_low_confidence_threshold() -> f64 {
    0.5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            outlier_z_threshold: default_outlier_z_threshold(),
            trim_fraction: default_trim_fraction(),
            precipitation_threshold_mm: default_precipitation_threshold(),
        }
    }
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            uncertainty_horizon_days: default_uncertainty_horizon(),
            low_confidence_threshold: default_low_confidence_threshold(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ConsensusConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // An explicit path must exist; the default location is optional
        let (config_file, required) = match config_path {
            Some(path) => (path, true),
            None => (
                Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml")),
                false,
            ),
        };

        if required || config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(required)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. WXCONSENSUS_LOGGING__LEVEL=debug
        builder = builder.add_source(
            Environment::with_prefix("WXCONSENSUS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ConsensusConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weather-consensus").join("config.toml"))
    }

    /// Apply default values to zeroed or empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.aggregation.outlier_z_threshold == 0.0 {
            self.aggregation.outlier_z_threshold = default_outlier_z_threshold();
        }
        if self.narrative.uncertainty_horizon_days == 0 {
            self.narrative.uncertainty_horizon_days = default_uncertainty_horizon();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        let aggregation = &self.aggregation;
        if !(aggregation.outlier_z_threshold > 0.0) {
            return Err(ConsensusError::config("Outlier z-score threshold must be positive").into());
        }

        if !(0.0..0.5).contains(&aggregation.trim_fraction) {
            return Err(
                ConsensusError::config("Trim fraction must be at least 0 and below 0.5").into(),
            );
        }

        if !(aggregation.precipitation_threshold_mm >= 0.0) {
            return Err(ConsensusError::config("Precipitation threshold cannot be negative").into());
        }

        if !(0.0..=1.0).contains(&self.narrative.low_confidence_threshold) {
            return Err(
                ConsensusError::config("Low confidence threshold must be within [0, 1]").into(),
            );
        }

        if self.narrative.uncertainty_horizon_days > 16 {
            return Err(ConsensusError::config("Uncertainty horizon cannot exceed 16 days").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ConsensusError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ConsensusError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ConsensusConfig::default();
        assert_eq!(config.aggregation.outlier_z_threshold, 2.0);
        assert_eq!(config.aggregation.trim_fraction, 0.1);
        assert_eq!(config.aggregation.precipitation_threshold_mm, 0.1);
        assert_eq!(config.narrative.uncertainty_horizon_days, 5);
        assert_eq!(config.narrative.low_confidence_threshold, 0.5);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = ConsensusConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_trim_fraction() {
        let mut config = ConsensusConfig::default();
        config.aggregation.trim_fraction = 0.5;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Trim fraction"));
    }

    #[test]
    fn test_config_validation_threshold() {
        let mut config = ConsensusConfig::default();
        config.aggregation.outlier_z_threshold = -1.0;
        assert!(config.validate().is_err());
        config.aggregation.outlier_z_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults() {
        let mut config = ConsensusConfig::default();
        config.aggregation.outlier_z_threshold = 0.0;
        config.logging.level.clear();
        config.apply_defaults();
        assert_eq!(config.aggregation.outlier_z_threshold, 2.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "weather-consensus-test-{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[aggregation]\ntrim_fraction = 0.2\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = ConsensusConfig::load_from_path(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.aggregation.trim_fraction, 0.2);
        assert_eq!(config.aggregation.outlier_z_threshold, 2.0);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.narrative.uncertainty_horizon_days, 5);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "weather-consensus-missing-{}.toml",
            std::process::id()
        ));
        assert!(!path.exists());
        assert!(ConsensusConfig::load_from_path(Some(path)).is_err());
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = ConsensusConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("weather-consensus"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
