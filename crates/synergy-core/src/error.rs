//! Error types for Synergy

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynergyError {
    // Dataset errors
    #[error("Invalid dataset format in {origin}: {reason}")]
    DataFormat { origin: String, reason: String },

    #[error("Dataset not found: {location}")]
    DatasetNotFound { location: String },

    // Join errors
    #[error(
        "Target configuration mismatch: {datasets} target datasets but {configs} target configs"
    )]
    ConfigurationMismatch { datasets: usize, configs: usize },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Export errors
    #[error("Export failed: {0}")]
    Export(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for SynergyError {
    fn from(err: csv::Error) -> Self {
        SynergyError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SynergyError>;
