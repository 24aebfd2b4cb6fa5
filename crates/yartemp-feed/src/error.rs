//! Error taxonomy for the feed pipeline.
//!
//! Every failure mode of a refresh cycle has its own variant so frontends
//! can react precisely; `user_message()` collapses them to short display
//! text. All errors are cloneable because they travel inside published
//! snapshots.

use thiserror::Error;

/// Errors produced by a refresh cycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Unexpected data size: found {found} fields, needed {needed}")]
    UnexpectedDataSize { found: usize, needed: usize },

    #[error("Temperature value is undefined")]
    UndefinedTemperature,

    #[error("Temperature change value is undefined")]
    UndefinedTemperatureChange,

    #[error("Day maximum temperature value is undefined")]
    UndefinedTemperatureDayMax,

    #[error("Day minimum temperature value is undefined")]
    UndefinedTemperatureDayMin,

    #[error("Last year temperature value is undefined")]
    UndefinedTemperatureDayLastYear,

    #[error("Day average temperature value is undefined")]
    UndefinedTemperatureDayAverage,

    #[error("Pressure value is undefined")]
    UndefinedPressure,

    #[error("Pressure change value is undefined")]
    UndefinedPressureChange,

    #[error("Temperature too high: {value} (max {max})")]
    TemperatureTooHigh { value: f64, max: f64 },

    #[error("Temperature too low: {value} (min {min})")]
    TemperatureTooLow { value: f64, min: f64 },

    #[error("Temperature change too high: {value} (max {max})")]
    TemperatureChangeTooHigh { value: f64, max: f64 },

    #[error("Temperature change too low: {value} (min {min})")]
    TemperatureChangeTooLow { value: f64, min: f64 },

    #[error("Day average temperature too high: {value} (max {max})")]
    TemperatureDayAverageTooHigh { value: f64, max: f64 },

    #[error("Day average temperature too low: {value} (min {min})")]
    TemperatureDayAverageTooLow { value: f64, min: f64 },

    #[error("Pressure too high: {value} (max {max})")]
    PressureTooHigh { value: f64, max: f64 },

    #[error("Pressure too low: {value} (min {min})")]
    PressureTooLow { value: f64, min: f64 },

    #[error("Pressure change too high: {value} (max {max})")]
    PressureChangeTooHigh { value: f64, max: f64 },

    #[error("Pressure change too low: {value} (min {min})")]
    PressureChangeTooLow { value: f64, min: f64 },

    #[error("Network error: {0}")]
    Transport(#[from] NetworkError),
}

impl ModelError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            ModelError::Transport(e) => e.user_message(),
            _ => "No temperature data.",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
///
/// `reqwest::Error` is neither cloneable nor comparable, so transport
/// failures are converted into this owned form at the client boundary.
#[derive(Debug, Clone, PartialEq, Error)]
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

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
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
