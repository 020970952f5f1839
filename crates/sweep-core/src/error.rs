//! Core error types for the Sweep scanner.
//!
//! This module defines the central error type shared by the workspace crates
//! together with the configuration-specific errors.

use thiserror::Error;

/// Central error type for Sweep operations that do not belong to a
/// single subsystem crate.
#[derive(Error, Debug)]
pub enum SweepError {
    /// Validation errors (invalid input, constraints)
    #[error("validation error: {0}")]
    Validation(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// An explicitly requested config file does not exist
    #[error("config file not found at {path}")]
    NotFound {
        /// Path where config was expected
        path: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `SweepError`.
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SweepError::Validation("bad slug".to_string());
        assert_eq!(err.to_string(), "validation error: bad slug");

        let err = ConfigError::NotFound {
            path: "/tmp/missing.toml".to_string(),
        };
        assert_eq!(err.to_string(), "config file not found at /tmp/missing.toml");
    }
}
