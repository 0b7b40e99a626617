//! Standardization of feature columns

use crate::error::{ForecastError, Result};
use crate::features::{FeatureVector, N_FEATURES};
use crate::models::FeatureScaler;

/// Scales each feature column to zero mean and unit variance.
///
/// Uses the population standard deviation. Constant columns get a scale of 1
/// so they map to zero instead of dividing by zero.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    params: Option<ScaleParams>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScaleParams {
    means: FeatureVector,
    scales: FeatureVector,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.params.is_some()
    }

    /// Column means learned at fit time
    pub fn means(&self) -> Option<&FeatureVector> {
        self.params.as_ref().map(|p| &p.means)
    }

    /// Column scales learned at fit time
    pub fn scales(&self) -> Option<&FeatureVector> {
        self.params.as_ref().map(|p| &p.scales)
    }

    fn apply(params: &ScaleParams, features: &[FeatureVector]) -> Vec<FeatureVector> {
        features
            .iter()
            .map(|row| {
                let mut scaled = [0.0; N_FEATURES];
                for j in 0..N_FEATURES {
                    scaled[j] = (row[j] - params.means[j]) / params.scales[j];
                }
                scaled
            })
            .collect()
    }
}

impl FeatureScaler for StandardScaler {
    fn fit_transform(&mut self, features: &[FeatureVector]) -> Result<Vec<FeatureVector>> {
        if features.is_empty() {
            return Err(ForecastError::InsufficientDataError(
                "Cannot fit a scaler on an empty feature matrix".to_string(),
            ));
        }

        let n = features.len() as f64;
        let mut means = [0.0; N_FEATURES];
        let mut scales = [0.0; N_FEATURES];

        for j in 0..N_FEATURES {
            let mean = features.iter().map(|row| row[j]).sum::<f64>() / n;
            let variance = features
                .iter()
                .map(|row| (row[j] - mean).powi(2))
                .sum::<f64>()
                / n;
            let std = variance.sqrt();

            means[j] = mean;
            scales[j] = if std < 1e-10 { 1.0 } else { std };
        }

        let params = ScaleParams { means, scales };
        self.params = Some(params);

        Ok(Self::apply(&params, features))
    }

    fn transform(&self, features: &[FeatureVector]) -> Result<Vec<FeatureVector>> {
        let params = self.params.as_ref().ok_or_else(|| {
            ForecastError::StateError("Scaler must be fitted before transform".to_string())
        })?;

        Ok(Self::apply(params, features))
    }
}
