//! Domain error types

use thiserror::Error;

/// Error when parsing a timeout string
#[derive(Debug, Clone, Error)]
#[error("Invalid timeout format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 5s, 1m, 1m30s)")]
pub struct TimeoutParseError {
    pub input: String,
}

/// Error when an invalid urgency level is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid urgency: \"{input}\". Valid levels are: low, normal, critical")]
pub struct UrgencyParseError {
    pub input: String,
}

/// Error when a resource string cannot be interpreted
#[derive(Debug, Clone, Error)]
pub enum ResourceError {
    #[error("Resource must not be empty")]
    Empty,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
