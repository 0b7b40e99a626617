//! Error types for the demand_planning crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the demand_planning crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Missing target column, misaligned target, or invalid model settings
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Operation invoked in the wrong lifecycle state (e.g. predict before fit)
    #[error("State error: {0}")]
    StateError(String),

    /// Not enough usable rows after feature derivation
    #[error("Insufficient data: {0}")]
    InsufficientDataError(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
