//! Error types and handling for the `SkyCast` client and proxy

use thiserror::Error;

/// Main error type for the `SkyCast` application
#[derive(Error, Debug)]
pub enum SkycastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The proxy answered with a non-success status
    #[error("{message} (HTTP {status})")]
    NotFound { message: String, status: u16 },

    /// The proxy could not be reached or sent an unreadable body
    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl SkycastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error carrying the proxy status
    pub fn not_found<S: Into<String>>(message: S, status: u16) -> Self {
        Self::NotFound {
            message: message.into(),
            status,
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkycastError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            SkycastError::Validation { message } | SkycastError::NotFound { message, .. } => {
                message.clone()
            }
            SkycastError::Transport { .. } => "Failed to fetch weather data".to_string(),
        }
    }
}

impl From<reqwest::Error> for SkycastError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}
