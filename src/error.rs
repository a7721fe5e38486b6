use std::io;
use thiserror::Error;

/// Custom error types for the birth-intake application
#[derive(Error, Debug)]
pub enum AppError {
    /// Error when API request fails or the service reports a failure in its payload
    #[error("API request failed: {0}")]
    ApiRequestFailed(String),

    /// Error when a suggestion carries coordinates that are not decimal numbers
    #[error("Invalid coordinate {axis}: {value:?}")]
    InvalidCoordinate { axis: &'static str, value: String },

    /// Error when environment variable is not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// Error when an environment variable holds an unusable value
    #[error("Invalid configuration for {name}: {reason}")]
    InvalidConfig { name: String, reason: String },

    /// Error when the form fails a field constraint on submission
    #[error("Invalid form: {0}")]
    Validation(String),

    /// Error when a terminal command is not recognised
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Wrapper for reqwest errors
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Wrapper for I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Wrapper for JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
