//! Random forest regression
//!
//! An ensemble of CART regression trees, each grown on a bootstrap sample of
//! the training rows. Splits minimize the summed squared error of the two
//! children; leaves predict the mean target of their rows. The forest
//! prediction is the mean over trees.

use crate::error::{ForecastError, Result};
use crate::features::{FeatureVector, N_FEATURES};
use crate::models::Regressor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Tree-growing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomForestConfig {
    /// Number of trees in the ensemble
    pub n_estimators: usize,
    /// Maximum tree depth; unlimited when `None`
    pub max_depth: Option<usize>,
    /// Minimum number of rows a node needs before it may split
    pub min_samples_split: usize,
    /// Seed for bootstrap sampling; drawn from the OS when `None`
    pub seed: Option<u64>,
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, features: &FeatureVector) -> f64 {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    score: f64,
}

/// Bagged ensemble of regression trees
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    name: String,
    config: RandomForestConfig,
    trees: Vec<Node>,
}

impl RandomForestRegressor {
    /// Create a forest with `n_estimators` trees and default growth settings
    pub fn new(n_estimators: usize) -> Result<Self> {
        Self::with_config(RandomForestConfig {
            n_estimators,
            ..RandomForestConfig::default()
        })
    }

    pub fn with_config(config: RandomForestConfig) -> Result<Self> {
        if config.n_estimators == 0 {
            return Err(ForecastError::ConfigurationError(
                "n_estimators must be positive".to_string(),
            ));
        }
        if config.min_samples_split < 2 {
            return Err(ForecastError::ConfigurationError(
                "min_samples_split must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Random Forest (n_estimators={})", config.n_estimators),
            config,
            trees: Vec::new(),
        })
    }

    pub fn config(&self) -> &RandomForestConfig {
        &self.config
    }

    pub fn n_estimators(&self) -> usize {
        self.config.n_estimators
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    fn grow(
        &self,
        features: &[FeatureVector],
        targets: &[f64],
        rows: &mut [usize],
        depth: usize,
    ) -> Node {
        let n = rows.len() as f64;
        let sum: f64 = rows.iter().map(|&i| targets[i]).sum();
        let leaf = Node::Leaf { value: sum / n };

        let depth_reached = self.config.max_depth.is_some_and(|max| depth >= max);
        if rows.len() < self.config.min_samples_split || depth_reached {
            return leaf;
        }

        let Some(best) = best_split(features, targets, rows, sum) else {
            return leaf;
        };

        // Maximizing sum_l^2/n_l + sum_r^2/n_r is minimizing the children's SSE
        if best.score <= sum * sum / n + 1e-12 {
            return leaf;
        }

        let (left_rows, right_rows) =
            partition(rows, |i| features[i][best.feature] <= best.threshold);
        if left_rows.is_empty() || right_rows.is_empty() {
            return leaf;
        }

        Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: Box::new(self.grow(features, targets, left_rows, depth + 1)),
            right: Box::new(self.grow(features, targets, right_rows, depth + 1)),
        }
    }
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self {
            name: "Random Forest (n_estimators=100)".to_string(),
            config: RandomForestConfig::default(),
            trees: Vec::new(),
        }
    }
}

/// Best threshold over all features for the given rows, if any split exists
fn best_split(
    features: &[FeatureVector],
    targets: &[f64],
    rows: &mut [usize],
    total: f64,
) -> Option<SplitCandidate> {
    let n = rows.len();
    let mut best: Option<SplitCandidate> = None;

    for feature in 0..N_FEATURES {
        rows.sort_by(|&a, &b| features[a][feature].total_cmp(&features[b][feature]));

        let mut left_sum = 0.0;
        for k in 0..n - 1 {
            left_sum += targets[rows[k]];

            let here = features[rows[k]][feature];
            let next = features[rows[k + 1]][feature];
            if here == next {
                continue;
            }

            let n_left = (k + 1) as f64;
            let n_right = (n - k - 1) as f64;
            let right_sum = total - left_sum;
            let score = left_sum * left_sum / n_left + right_sum * right_sum / n_right;

            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(SplitCandidate {
                    feature,
                    threshold: (here + next) / 2.0,
                    score,
                });
            }
        }
    }

    best
}

/// Reorder `rows` so rows matching `goes_left` come first, and split there
fn partition(
    rows: &mut [usize],
    goes_left: impl Fn(usize) -> bool,
) -> (&mut [usize], &mut [usize]) {
    let mut boundary = 0;
    for k in 0..rows.len() {
        if goes_left(rows[k]) {
            rows.swap(boundary, k);
            boundary += 1;
        }
    }
    rows.split_at_mut(boundary)
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, features: &[FeatureVector], targets: &[f64]) -> Result<()> {
        if features.len() != targets.len() {
            return Err(ForecastError::DataError(format!(
                "Feature rows ({}) don't match targets ({})",
                features.len(),
                targets.len()
            )));
        }
        if features.is_empty() {
            return Err(ForecastError::InsufficientDataError(
                "Cannot fit a random forest on an empty training set".to_string(),
            ));
        }
        if targets.iter().any(|t| !t.is_finite()) {
            return Err(ForecastError::DataError(
                "Targets must be finite".to_string(),
            ));
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let n = features.len();
        let mut trees = Vec::with_capacity(self.config.n_estimators);
        for _ in 0..self.config.n_estimators {
            let mut sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            trees.push(self.grow(features, targets, &mut sample, 0));
        }

        self.trees = trees;
        Ok(())
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(ForecastError::StateError(
                "Random forest must be fitted before prediction".to_string(),
            ));
        }

        let total: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        Ok(total / self.trees.len() as f64)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Vec<FeatureVector>, Vec<f64>) {
        let features = (0..20)
            .map(|i| [i as f64, 0.0, 1.0, 1.0])
            .collect::<Vec<_>>();
        let targets = (0..20).map(|i| if i < 10 { 1.0 } else { 5.0 }).collect();
        (features, targets)
    }

    #[test]
    fn test_single_tree_learns_step() {
        let (features, targets) = step_data();
        let mut forest = RandomForestRegressor::with_config(RandomForestConfig {
            n_estimators: 1,
            seed: Some(7),
            ..RandomForestConfig::default()
        })
        .unwrap();
        forest.fit(&features, &targets).unwrap();

        // Any bootstrap sample of a clean step function still splits between the plateaus
        assert_eq!(forest.predict(&[0.0, 0.0, 1.0, 1.0]).unwrap(), 1.0);
        assert_eq!(forest.predict(&[19.0, 0.0, 1.0, 1.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_constant_target_gives_constant_prediction() {
        let features = vec![[1.0, 2.0, 3.0, 4.0], [2.0, 3.0, 4.0, 5.0], [3.0, 1.0, 2.0, 6.0]];
        let targets = vec![4.0, 4.0, 4.0];
        let mut forest = RandomForestRegressor::new(5).unwrap();
        forest.fit(&features, &targets).unwrap();
        assert_eq!(forest.predict(&[10.0, 10.0, 10.0, 10.0]).unwrap(), 4.0);
    }

    #[test]
    fn test_max_depth_zero_predicts_sample_mean() {
        let (features, targets) = step_data();
        let mut forest = RandomForestRegressor::with_config(RandomForestConfig {
            n_estimators: 3,
            max_depth: Some(0),
            seed: Some(1),
            ..RandomForestConfig::default()
        })
        .unwrap();
        forest.fit(&features, &targets).unwrap();

        let prediction = forest.predict(&[0.0, 0.0, 1.0, 1.0]).unwrap();
        assert!((1.0..=5.0).contains(&prediction));
        assert_eq!(prediction, forest.predict(&[19.0, 0.0, 1.0, 1.0]).unwrap());
    }

    #[test]
    fn test_seeded_forests_agree() {
        let (features, targets) = step_data();
        let config = RandomForestConfig {
            n_estimators: 10,
            seed: Some(42),
            ..RandomForestConfig::default()
        };

        let mut a = RandomForestRegressor::with_config(config).unwrap();
        let mut b = RandomForestRegressor::with_config(config).unwrap();
        a.fit(&features, &targets).unwrap();
        b.fit(&features, &targets).unwrap();

        for x in [0.0, 4.5, 9.5, 12.0, 30.0] {
            let row = [x, 0.0, 1.0, 1.0];
            assert_eq!(a.predict(&row).unwrap(), b.predict(&row).unwrap());
        }
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            RandomForestRegressor::new(0),
            Err(ForecastError::ConfigurationError(_))
        ));
        assert!(RandomForestRegressor::with_config(RandomForestConfig {
            min_samples_split: 1,
            ..RandomForestConfig::default()
        })
        .is_err());
    }

    #[test]
    fn test_predict_before_fit() {
        let forest = RandomForestRegressor::default();
        assert!(matches!(
            forest.predict(&[0.0; N_FEATURES]),
            Err(ForecastError::StateError(_))
        ));
    }

    #[test]
    fn test_fit_rejects_mismatched_lengths() {
        let mut forest = RandomForestRegressor::default();
        let result = forest.fit(&[[0.0; N_FEATURES]], &[1.0, 2.0]);
        assert!(matches!(result, Err(ForecastError::DataError(_))));
    }
}
