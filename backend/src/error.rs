//! Error types for the analytics engine.
//!
//! The engine itself never fails on data: malformed records are excluded from the
//! view they cannot take part in. Errors only describe bad user input (reported
//! back as validation messages) and unreadable configuration.

use std::path::PathBuf;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Invalid user-adjustable parameters.
///
/// These are surfaced as human-readable messages next to a complete result, never
/// propagated as faults.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Worker hypotheses only support the equality operator (got '{0}')")]
    UnsupportedWorkerOperator(String),

    #[error("Unknown comparison operator '{0}'. Use one of ==, !=, >, >=, <, <=")]
    UnknownOperator(String),

    #[error("Worker hypothesis requires a worker name")]
    EmptyWorkerValue,

    #[error("Date hypothesis requires a date")]
    EmptyDateValue,

    #[error("'{0}' is not a recognised date (expected YYYY-MM-DD, '2 Jan 2024' or an ISO or RFC 2822 date-time)")]
    InvalidDate(String),

    #[error("Band multiplier '{0}' is not a number")]
    InvalidMultiplier(String),

    #[error("Bin size '{value}' is not a number; using {fallback}")]
    InvalidBinSize { value: String, fallback: f64 },

    #[error("Bin size must be a positive number (got {value}); using {fallback}")]
    NonPositiveBinSize { value: f64, fallback: f64 },

    #[error("Normalized range bound '{0}' is not a finite number; ignoring it")]
    InvalidRangeBound(f64),
}

/// Configuration file errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("No {0} found in standard locations")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_descriptive() {
        let err = ValidationError::UnsupportedWorkerOperator(">".to_string());
        assert!(err.to_string().contains("'>'"));

        let err = ValidationError::NonPositiveBinSize {
            value: -1.0,
            fallback: 5.0,
        };
        assert_eq!(
            err.to_string(),
            "Bin size must be a positive number (got -1); using 5"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid("port must be non-zero".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: port must be non-zero");
    }
}
