// src/error.rs

//! Unified error handling for the review watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Review API request failed or answered with a non-OK status
    #[error("API request failed: {0}")]
    Transport(String),

    /// Response body does not have the expected shape
    #[error("Unexpected API response: {0}")]
    Schema(#[from] SchemaError),

    /// Homework record lacks a required field
    #[error("Incomplete homework record: {0}")]
    IncompleteRecord(String),

    /// Homework status outside the known set
    #[error("Unknown homework status '{0}'")]
    UnknownStatus(String),

    /// Messaging channel rejected or failed to receive a message
    #[error("Message delivery failed: {0}")]
    Delivery(String),

    /// One or more required credentials are empty
    #[error("Missing required credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be constructed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Specific reason a response body failed shape validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("response has no 'homeworks' key")]
    MissingHomeworks,

    #[error("'homeworks' is not a list")]
    HomeworksNotArray,
}

impl AppError {
    /// Create a transport error.
    pub fn transport(message: impl fmt::Display) -> Self {
        Self::Transport(message.to_string())
    }

    /// Create an incomplete-record error naming the offending field.
    pub fn incomplete(field: impl fmt::Display) -> Self {
        Self::IncompleteRecord(field.to_string())
    }

    /// Create a delivery error.
    pub fn delivery(message: impl fmt::Display) -> Self {
        Self::Delivery(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error ends a single poll cycle without stopping the loop.
    ///
    /// Every other kind is either handled before it reaches the driver
    /// (`Delivery`) or indicates a startup or programming fault.
    pub fn is_cycle_failure(&self) -> bool {
        match self {
            Self::Transport(_)
            | Self::Schema(_)
            | Self::IncompleteRecord(_)
            | Self::UnknownStatus(_) => true,
            Self::Delivery(_)
            | Self::MissingCredentials(_)
            | Self::Io(_)
            | Self::Http(_)
            | Self::Toml(_)
            | Self::Url(_)
            | Self::Config(_)
            | Self::Validation(_) => false,
        }
    }
}
