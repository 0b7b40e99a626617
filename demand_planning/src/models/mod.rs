//! Regression and feature-scaling capabilities used by the forecaster
//!
//! The forecaster only relies on the two traits below. Any backing that
//! deterministically maps a fitted 4-feature row to a scalar can stand in for
//! the default random forest, and any scaler whose parameters are frozen at
//! fit time can stand in for the standard scaler.

use crate::error::Result;
use crate::features::FeatureVector;
use std::fmt::Debug;

/// A trainable point-estimate regressor
pub trait Regressor: Debug {
    /// Train on a feature matrix and its aligned targets, replacing any
    /// previous fit
    fn fit(&mut self, features: &[FeatureVector], targets: &[f64]) -> Result<()>;

    /// Point prediction for one feature row
    fn predict(&self, features: &FeatureVector) -> Result<f64>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// A trainable feature transform
pub trait FeatureScaler: Debug {
    /// Learn scaling parameters from `features` and return them scaled
    fn fit_transform(&mut self, features: &[FeatureVector]) -> Result<Vec<FeatureVector>>;

    /// Scale rows with the parameters learned by the last `fit_transform`
    fn transform(&self, features: &[FeatureVector]) -> Result<Vec<FeatureVector>>;
}

pub mod random_forest;
pub mod scaler;

pub use random_forest::{RandomForestConfig, RandomForestRegressor};
pub use scaler::StandardScaler;
