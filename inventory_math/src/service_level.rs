//! Service level to z-score conversion
//!
//! A service level is the target probability of not stocking out during the
//! replenishment lead time. The matching z-score is the standard normal
//! quantile at that probability.

use crate::{InventoryError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Check that a service level lies in the open interval (0, 1)
pub fn validate_service_level(service_level: f64) -> Result<()> {
    if !service_level.is_finite() || service_level <= 0.0 || service_level >= 1.0 {
        return Err(InventoryError::ConfigurationError(format!(
            "Service level must be strictly between 0 and 1, got {}",
            service_level
        )));
    }
    Ok(())
}

/// Standard normal quantile `Φ⁻¹(service_level)`.
///
/// # Examples
///
/// ```
/// use inventory_math::z_score;
///
/// assert!(z_score(0.5).unwrap().abs() < 1e-9);
/// assert!((z_score(0.975).unwrap() - 1.959964).abs() < 1e-5);
/// ```
pub fn z_score(service_level: f64) -> Result<f64> {
    validate_service_level(service_level)?;

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| InventoryError::DistributionError(e.to_string()))?;

    Ok(normal.inverse_cdf(service_level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_median_maps_to_zero() {
        assert_abs_diff_eq!(z_score(0.5).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_common_service_levels() {
        assert_abs_diff_eq!(z_score(0.90).unwrap(), 1.281552, epsilon = 1e-5);
        assert_abs_diff_eq!(z_score(0.95).unwrap(), 1.644854, epsilon = 1e-5);
        assert_abs_diff_eq!(z_score(0.975).unwrap(), 1.959964, epsilon = 1e-5);
        assert_abs_diff_eq!(z_score(0.99).unwrap(), 2.326348, epsilon = 1e-5);
    }

    #[test]
    fn test_symmetry() {
        let upper = z_score(0.8).unwrap();
        let lower = z_score(0.2).unwrap();
        assert_abs_diff_eq!(upper, -lower, epsilon = 1e-9);
    }

    #[test]
    fn test_out_of_range_levels_rejected() {
        for level in [0.0, 1.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                z_score(level),
                Err(InventoryError::ConfigurationError(_))
            ));
        }
    }
}
