//! # sctk
//!
//! Supply chain toolkit: forecast demand for an item from its daily sales
//! history, then turn demand variability into stocking policy numbers.
//!
//! The two halves live in separate crates and only meet through plain
//! numbers:
//!
//! - [`demand_planning`]: feature derivation and the autoregressive forecaster
//! - [`inventory_math`]: service-level z-scores, safety stock, reorder points
//!
//! ## Example
//!
//! ```no_run
//! use sctk::{plan_inventory, InventoryOptimizer};
//!
//! let forecast = vec![12.0, 14.0, 11.0, 13.0, 15.0, 12.0, 14.0];
//! let optimizer = InventoryOptimizer::new(7, 0.95).unwrap();
//! let policy = plan_inventory(&forecast, &optimizer).unwrap();
//! assert!(policy.reorder_point > policy.safety_stock);
//! ```

use thiserror::Error;
use tracing::info;

pub mod observability;

pub use demand_planning::{
    self, demand_statistics, DemandForecast, DemandForecaster, DemandSeries, DemandStatistics,
    ForecastError, ForecasterConfig, TrainingTarget,
};
pub use inventory_math::{
    self, InventoryConfig, InventoryError, InventoryOptimizer, InventoryPolicy,
};

/// Errors from the combined forecasting and inventory workflow
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// Result type for the combined workflow
pub type Result<T> = std::result::Result<T, PlanningError>;

/// Derive an inventory policy from forecast (or recent) per-period demand.
///
/// The mean of `demand` is used as average sales per period and its sample
/// standard deviation as the demand spread.
pub fn plan_inventory(demand: &[f64], optimizer: &InventoryOptimizer) -> Result<InventoryPolicy> {
    let stats = demand_statistics(demand)?;
    let policy = optimizer.plan(stats.mean, stats.std_dev)?;

    info!(
        periods = demand.len(),
        mean = stats.mean,
        std_dev = stats.std_dev,
        safety_stock = policy.safety_stock,
        reorder_point = policy.reorder_point,
        "planned inventory policy"
    );

    Ok(policy)
}
