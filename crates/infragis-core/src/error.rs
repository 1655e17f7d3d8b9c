//! Error types for InfraGIS

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfragisError {
    // Document errors
    #[error("Invalid GeoJSON document: {reason}")]
    InvalidDocument { reason: String },

    // Format errors
    #[error("Unsupported format '{extension}'. Supported: {}", supported.join(", "))]
    UnsupportedFormat {
        extension: String,
        supported: Vec<String>,
    },

    #[error("{format} error: {message}")]
    FormatError { format: String, message: String },

    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    // Mapping errors
    #[error("Unknown field '{name}'. Expected one of: lat, lon, name, type, location, cost, status, startDate, endDate, contractor, description")]
    UnknownField { name: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Tabular errors
    #[error("CSV error: {0}")]
    Csv(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<csv::Error> for InfragisError {
    fn from(err: csv::Error) -> Self {
        InfragisError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for InfragisError {
    fn from(err: serde_json::Error) -> Self {
        InfragisError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InfragisError>;
