//! # Inventory Math
//!
//! Statistical inventory control calculations.
//! This crate turns demand variability into stocking policy numbers:
//! service-level z-scores, safety stock and reorder points.

use thiserror::Error;

pub mod optimizer;
pub mod service_level;

pub use optimizer::{InventoryConfig, InventoryOptimizer, InventoryPolicy};
pub use service_level::z_score;

/// Errors that can occur in inventory policy calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InventoryError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Distribution error: {0}")]
    DistributionError(String),
}

/// Result type for inventory math operations
pub type Result<T> = std::result::Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InventoryError::ConfigurationError("service level 1.2".to_string());
        assert_eq!(err.to_string(), "Configuration error: service level 1.2");

        let err = InventoryError::InvalidInput("negative std".to_string());
        assert!(err.to_string().starts_with("Invalid input"));
    }
}
