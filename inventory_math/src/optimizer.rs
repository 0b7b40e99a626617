//! Safety stock and reorder point calculations
//!
//! Both formulas assume demand per period is normally distributed and
//! independent across periods, so demand variability over the lead time
//! grows with `sqrt(lead_time)`:
//!
//! - `safety_stock = z(service_level) * demand_std * sqrt(lead_time)`
//! - `reorder_point = average_sales * lead_time + safety_stock`

use crate::service_level::{validate_service_level, z_score};
use crate::{InventoryError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inventory policy parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Days between placing an order and receiving it
    pub lead_time: u32,
    /// Desired probability of avoiding a stockout during the lead time
    pub service_level: f64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            lead_time: 7,
            service_level: 0.95,
        }
    }
}

/// Safety stock and reorder point for one item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InventoryPolicy {
    pub safety_stock: f64,
    pub reorder_point: f64,
}

/// Calculates inventory control parameters from demand statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryOptimizer {
    lead_time: u32,
    service_level: f64,
    z_score: f64,
}

impl InventoryOptimizer {
    /// Create an optimizer for the given lead time (days) and service level.
    ///
    /// Fails with [`InventoryError::ConfigurationError`] unless
    /// `0 < service_level < 1`, since the normal quantile is undefined
    /// outside that interval.
    pub fn new(lead_time: u32, service_level: f64) -> Result<Self> {
        if let Err(err) = validate_service_level(service_level) {
            debug!(service_level, "rejected inventory configuration");
            return Err(err);
        }

        Ok(Self {
            lead_time,
            service_level,
            z_score: z_score(service_level)?,
        })
    }

    /// Create an optimizer from a deserialized configuration
    pub fn from_config(config: &InventoryConfig) -> Result<Self> {
        Self::new(config.lead_time, config.service_level)
    }

    pub fn lead_time(&self) -> u32 {
        self.lead_time
    }

    pub fn service_level(&self) -> f64 {
        self.service_level
    }

    /// z-score for the configured service level
    pub fn z_score(&self) -> f64 {
        self.z_score
    }

    /// Safety stock for the given standard deviation of per-period demand.
    ///
    /// # Examples
    ///
    /// ```
    /// use inventory_math::InventoryOptimizer;
    ///
    /// let optimizer = InventoryOptimizer::new(4, 0.975).unwrap();
    /// let stock = optimizer.calculate_safety_stock(10.0).unwrap();
    /// assert!((stock - 1.959964 * 10.0 * 2.0).abs() < 1e-4);
    /// ```
    pub fn calculate_safety_stock(&self, demand_std: f64) -> Result<f64> {
        if !demand_std.is_finite() || demand_std < 0.0 {
            return Err(InventoryError::InvalidInput(format!(
                "Demand standard deviation must be a finite non-negative number, got {}",
                demand_std
            )));
        }

        Ok(self.z_score * demand_std * f64::from(self.lead_time).sqrt())
    }

    /// Inventory level at which a replenishment order should be placed.
    ///
    /// Negative `average_sales` is accepted and propagates as-is.
    pub fn calculate_reorder_point(&self, average_sales: f64, safety_stock: f64) -> f64 {
        average_sales * f64::from(self.lead_time) + safety_stock
    }

    /// Safety stock and reorder point in one call
    pub fn plan(&self, average_sales: f64, demand_std: f64) -> Result<InventoryPolicy> {
        let safety_stock = self.calculate_safety_stock(demand_std)?;
        let reorder_point = self.calculate_reorder_point(average_sales, safety_stock);

        debug!(
            lead_time = self.lead_time,
            service_level = self.service_level,
            safety_stock,
            reorder_point,
            "computed inventory policy"
        );

        Ok(InventoryPolicy {
            safety_stock,
            reorder_point,
        })
    }
}

impl Default for InventoryOptimizer {
    fn default() -> Self {
        let config = InventoryConfig::default();
        Self {
            lead_time: config.lead_time,
            service_level: config.service_level,
            // Φ⁻¹(0.95)
            z_score: 1.644_853_626_951_472_2,
        }
    }
}
