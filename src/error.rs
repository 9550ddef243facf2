// src/error.rs

//! Unified error handling for the printer monitor.

use std::fmt;

use thiserror::Error;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Database operation failed
    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// External SNMP query failed
    #[error("SNMP error for {address}: {message}")]
    Snmp { address: String, message: String },

    /// Report delivery failed
    #[error("Delivery via {sink} failed: {message}")]
    Delivery { sink: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an SNMP error for a device address.
    pub fn snmp(address: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Snmp {
            address: address.into(),
            message: message.to_string(),
        }
    }

    /// Create a delivery error for a named sink.
    pub fn delivery(sink: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Delivery {
            sink: sink.into(),
            message: message.to_string(),
        }
    }
}
