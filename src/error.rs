//! Error types and handling for the `RouteWise` service

use thiserror::Error;

/// Main error type for the `RouteWise` service
#[derive(Error, Debug)]
pub enum RouteWiseError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Backend communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Requested entity does not exist on the backend
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl RouteWiseError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RouteWiseError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            RouteWiseError::Api { .. } => {
                "Unable to reach the trip backend. Please try again later.".to_string()
            }
            RouteWiseError::NotFound { message } => format!("Not found: {message}"),
            RouteWiseError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            RouteWiseError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
            RouteWiseError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for RouteWiseError {
    fn from(err: reqwest::Error) -> Self {
        Self::api(format!("Request failed: {err}"))
    }
}
