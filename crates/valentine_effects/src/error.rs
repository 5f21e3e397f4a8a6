//! # Configuration Error Types

use std::path::PathBuf;

use thiserror::Error;
use valentine_core::EngineError;

/// Errors that can occur while loading effect configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// A value was rejected by the engine (e.g. a bad colour string).
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
