//! Error types for playpub

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using PublishError
pub type Result<T> = std::result::Result<T, PublishError>;

/// Main error type for publish operations
#[derive(Debug, Error)]
pub enum PublishError {
    /// Configuration file or value problems
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Malformed expansion file entry or inconsistent publish inputs
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A file could not be opened or read, or a directory could not be listed
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The publishing service rejected a request
    #[error("{0}")]
    RemoteRejected(String),

    /// The publishing service could not be reached or authenticated against
    #[error("{0}")]
    RemoteUnavailable(String),

    /// Release descriptor construction failed
    #[error("failed to update listing, reason: {0}")]
    BuildFailure(Box<PublishError>),
}

impl PublishError {
    /// Create an IO error with the operation and file it concerns
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}
