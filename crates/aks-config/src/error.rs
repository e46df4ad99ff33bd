//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading or validating a deployment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file was not valid JSON or is missing a required key.
    #[error("invalid config JSON: {detail}")]
    Parse {
        /// Parser detail, including the missing key name when applicable.
        detail: String,
    },

    /// A required field was present but empty.
    #[error("config field '{field}' must be present and non-empty")]
    MissingOrEmpty {
        /// The offending field.
        field: String,
    },

    /// A numeric field fell outside its allowed range.
    #[error("config field '{field}' must be within [{min}, {max}], got {actual}")]
    OutOfRange {
        /// The offending field.
        field: String,
        /// Minimum allowed value (inclusive).
        min: u32,
        /// Maximum allowed value (inclusive).
        max: u32,
        /// The value provided.
        actual: u32,
    },
}

impl ConfigError {
    /// Create a read error.
    #[must_use]
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(detail: impl Into<String>) -> Self {
        Self::Parse {
            detail: detail.into(),
        }
    }

    /// Create a missing-or-empty field error.
    #[must_use]
    pub fn missing_or_empty(field: impl Into<String>) -> Self {
        Self::MissingOrEmpty {
            field: field.into(),
        }
    }

    /// Create an out-of-range field error.
    #[must_use]
    pub fn out_of_range(field: impl Into<String>, min: u32, max: u32, actual: u32) -> Self {
        Self::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
