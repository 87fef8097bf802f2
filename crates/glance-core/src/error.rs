//! Centralized error types for the Glance widgets.
//!
//! Every failure inside a widget pipeline is one of a closed set of variants
//! wrapped by [`WidgetError`]. Pipelines propagate with `?`; the widget entry
//! point is the only place that catches and turns an error into the error view.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for a widget run.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("{0}")]
    Configuration(#[from] ConfigError),

    #[error("{0}")]
    Location(#[from] LocationError),

    #[error("{0}")]
    Network(#[from] NetworkError),

    #[error("{0}")]
    DataShape(#[from] DataShapeError),

    #[error("{0}")]
    Cache(#[from] CacheError),

    #[error("Render error: {0}")]
    Render(String),
}

impl WidgetError {
    /// Short, non-technical message for places with no room for detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            WidgetError::Configuration(e) => e.user_message(),
            WidgetError::Location(e) => e.user_message(),
            WidgetError::Network(e) => e.user_message(),
            WidgetError::DataShape(_) => "Received unexpected data. Try again later.",
            WidgetError::Cache(_) => "Local cache could not be written.",
            WidgetError::Render(_) => "The widget could not be drawn.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    /// A required setting is empty or still holds its placeholder value.
    #[error("{hint}")]
    MissingSetting { field: &'static str, hint: String },
}

impl ConfigError {
    pub fn missing(field: &'static str, hint: impl Into<String>) -> Self {
        ConfigError::MissingSetting {
            field,
            hint: hint.into(),
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting { .. } => {
                "A required setting is missing. Check your settings."
            }
        }
    }
}

/// Current-location lookup errors.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Location lookup returned no position")]
    NoPosition,

    #[error("Invalid static location '{0}'")]
    InvalidStatic(String),
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::ServiceUnavailable(_) | LocationError::NoPosition => {
                "Unable to determine your location."
            }
            LocationError::InvalidStatic(_) => "The static location setting is not valid.",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status == 401 || *status == 403 => {
                "The service rejected the credentials. Check your settings."
            }
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// A response or cached record did not have the shape the widget needs.
#[derive(Debug, Error)]
pub enum DataShapeError {
    #[error("Missing field '{0}' in response")]
    MissingField(&'static str),

    #[error("No hourly interval covers {0}")]
    NoCurrentInterval(String),

    #[error("No '{0}' allowance in usage data")]
    MissingAllowance(String),

    #[error("Unparseable {field}: '{value}'")]
    BadValue { field: &'static str, value: String },

    #[error("Malformed {what}: {detail}")]
    Malformed { what: &'static str, detail: String },
}

/// Cache store errors. Reads never fail (an unreadable file is treated as
/// absent), so these all come from writing.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize cache record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

impl From<reqwest::Error> for WidgetError {
    fn from(e: reqwest::Error) -> Self {
        WidgetError::Network(e.into_network_error())
    }
}
