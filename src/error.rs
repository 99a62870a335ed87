//! Error types for the consensus pipeline

use thiserror::Error;

/// Main error type for the consensus pipeline
#[derive(Error, Debug)]
pub enum ConsensusError {
    /// Aggregation was asked to combine zero model forecasts
    #[error("Cannot aggregate an empty list of model forecasts")]
    EmptyInput,

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON (de)serialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl ConsensusError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ConsensusError::EmptyInput => {
                "No model forecasts were available to combine.".to_string()
            }
            ConsensusError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            ConsensusError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            ConsensusError::Io { .. } => {
                "File operation failed. Please check the input path and permissions.".to_string()
            }
            ConsensusError::Serialization { .. } => {
                "Forecast input could not be read. Please check the JSON format.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let validation_err = ConsensusError::validation("humidity out of range");
        assert!(matches!(validation_err, ConsensusError::Validation { .. }));

        let config_err = ConsensusError::config("bad trim fraction");
        assert!(matches!(config_err, ConsensusError::Config { .. }));
    }

    #[test]
    fn test_user_messages() {
        assert!(ConsensusError::EmptyInput
            .user_message()
            .contains("No model forecasts"));

        let validation_err = ConsensusError::validation("score 1.5");
        assert!(validation_err.user_message().contains("score 1.5"));

        let config_err = ConsensusError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ConsensusError = io_err.into();
        assert!(matches!(err, ConsensusError::Io { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: ConsensusError = json_err.into();
        assert!(matches!(err, ConsensusError::Serialization { .. }));
    }
}
