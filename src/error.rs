// src/error.rs

//! Unified error handling for the menu fusion pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A vendor document could not be fetched or walked
    #[error("Extraction failed for {vendor}: {message}")]
    Extract { vendor: String, message: String },

    /// The store rejected a batch
    #[error("Load failed for table {table}: {message}")]
    Load { table: String, message: String },
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

    /// Create an extraction error for a vendor.
    pub fn extract(vendor: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Extract {
            vendor: vendor.into(),
            message: message.to_string(),
        }
    }

    /// Create a load error for a store table.
    pub fn load(table: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Load {
            table: table.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_error_names_vendor() {
        let err = AppError::extract("sushido", "missing field `id`");
        assert_eq!(
            err.to_string(),
            "Extraction failed for sushido: missing field `id`"
        );
    }

    #[test]
    fn json_error_converts() {
        let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: AppError = parsed.unwrap_err().into();
        assert!(matches!(err, AppError::Json(_)));
    }
}
