//! # Demand Planning
//!
//! Demand forecasting from lagged daily sales history.
//!
//! ## Features
//!
//! - Lag and calendar feature derivation over polars `DataFrame`s
//! - A trainable forecaster with an autoregressive multi-step rollout
//! - Pluggable regression and scaling capabilities (random forest and
//!   standard scaler by default)
//! - Accuracy metrics and demand summary statistics
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use demand_planning::{DemandForecaster, DemandSeries, ForecasterConfig, TrainingTarget};
//!
//! # fn main() -> demand_planning::Result<()> {
//! let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let dates = (0..30).map(|i| start + chrono::Duration::days(i)).collect();
//! let quantities = (0..30).map(|i| 20.0 + (i % 7) as f64).collect();
//! let history = DemandSeries::new(dates, quantities)?;
//!
//! let mut forecaster = DemandForecaster::new(ForecasterConfig {
//!     seed: Some(42),
//!     ..ForecasterConfig::default()
//! })?;
//! forecaster.fit(history.dataframe(), TrainingTarget::FromColumn)?;
//!
//! let forecast = forecaster.predict(history.tail(14).dataframe(), 7)?;
//! let stats = forecast.statistics()?;
//! println!("mean {:.1}, std {:.1}", stats.mean, stats.std_dev);
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use crate::data::DemandSeries;
pub use crate::error::{ForecastError, Result};
pub use crate::features::{build_features, FeatureVector, FEATURE_COLUMNS};
pub use crate::forecaster::{DemandForecast, DemandForecaster, ForecasterConfig, TrainingTarget};
pub use crate::models::{FeatureScaler, RandomForestRegressor, Regressor, StandardScaler};
pub use crate::utils::{demand_statistics, DemandStatistics};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
