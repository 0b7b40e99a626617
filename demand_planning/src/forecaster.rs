//! Demand forecaster with an autoregressive multi-step rollout
//!
//! Training learns `quantity ~ f(lag_1, lag_2, month, day_of_week)`.
//! Forecasting runs the fitted model one day at a time: each prediction is
//! appended to a rollout buffer as a synthetic observation, so the lag
//! features of later steps are built from earlier predictions. Forecast
//! errors therefore compound forward the way they would in a real
//! autoregressive process.

use crate::data::{self, DATE, QUANTITY};
use crate::error::{ForecastError, Result};
use crate::features::{self, calendar_features, FeatureVector, DAY_OF_WEEK, LAG_1, LAG_2, MONTH};
use crate::models::{
    FeatureScaler, RandomForestConfig, RandomForestRegressor, Regressor, StandardScaler,
};
use crate::utils::{demand_statistics, future_dates, DemandStatistics};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Name of the rollout column flagging synthesized rows
pub const SYNTHETIC: &str = "synthetic";

/// Name of the training column the regressor is fitted against
pub const TARGET: &str = "target";

/// Forecaster settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecasterConfig {
    /// Number of trees in the default random forest
    pub n_estimators: usize,
    /// Days between placing an order and receiving it
    pub lead_time: u32,
    /// Maximum tree depth; unlimited when `None`
    pub max_depth: Option<usize>,
    /// Minimum number of rows a tree node needs before it may split
    pub min_samples_split: usize,
    /// Seed for the forest's bootstrap sampling
    pub seed: Option<u64>,
}

impl Default for ForecasterConfig {
    fn default() -> Self {
        let forest = RandomForestConfig::default();
        Self {
            n_estimators: forest.n_estimators,
            lead_time: 7,
            max_depth: forest.max_depth,
            min_samples_split: forest.min_samples_split,
            seed: forest.seed,
        }
    }
}

impl ForecasterConfig {
    /// Forest settings carried by this configuration
    pub fn forest(&self) -> RandomForestConfig {
        RandomForestConfig {
            n_estimators: self.n_estimators,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            seed: self.seed,
        }
    }

    pub fn validate(&self) -> Result<()> {
        RandomForestRegressor::with_config(self.forest()).map(|_| ())
    }
}

/// Where the training target comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingTarget {
    /// Use the history's own `quantity` column
    FromColumn,
    /// Use these values, aligned 1:1 with the history's rows. Lags still
    /// come from the history's `quantity` column when it has one.
    Explicit(Vec<f64>),
}

/// Output of [`DemandForecaster::predict`]
#[derive(Debug, Clone)]
pub struct DemandForecast {
    values: Vec<f64>,
    dates: Vec<NaiveDate>,
    rollout: DataFrame,
}

impl DemandForecast {
    /// Predicted quantities in chronological order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Forecast dates, one day apart, starting the day after the history ends
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The rollout buffer after the last step: the seed history followed by
    /// one synthesized row per forecast period
    pub fn rollout(&self) -> &DataFrame {
        &self.rollout
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Mean and standard deviation of the forecast values
    pub fn statistics(&self) -> Result<DemandStatistics> {
        demand_statistics(&self.values)
    }
}

/// Growing table of observations used during the rollout
#[derive(Debug)]
struct RolloutBuffer {
    dates: Vec<NaiveDate>,
    quantities: Vec<Option<f64>>,
    lag_1: Vec<Option<f64>>,
    lag_2: Vec<Option<f64>>,
    month: Vec<Option<f64>>,
    day_of_week: Vec<Option<f64>>,
    synthetic: Vec<bool>,
}

impl RolloutBuffer {
    fn seed(history: &DataFrame) -> Result<Self> {
        let with_lags = features::with_lag_features(history)?;
        let dates = data::date_column(&with_lags)?;
        data::ensure_chronological(&dates)?;

        let len = dates.len();
        Ok(Self {
            dates,
            quantities: data::quantity_column(&with_lags, QUANTITY)?,
            lag_1: data::quantity_column(&with_lags, LAG_1)?,
            lag_2: data::quantity_column(&with_lags, LAG_2)?,
            month: data::quantity_column(&with_lags, MONTH)?,
            day_of_week: data::quantity_column(&with_lags, DAY_OF_WEEK)?,
            synthetic: vec![false; len],
        })
    }

    fn len(&self) -> usize {
        self.dates.len()
    }

    /// Feature row of the most recent observation, if that observation is
    /// complete (known quantity and a full lag history)
    fn latest_features(&self) -> Option<FeatureVector> {
        let last = self.len().checked_sub(1)?;
        self.quantities[last]?;
        Some([
            self.lag_1[last]?,
            self.lag_2[last]?,
            self.month[last]?,
            self.day_of_week[last]?,
        ])
    }

    fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Append a synthetic observation dated `date`
    fn push_prediction(&mut self, date: NaiveDate, prediction: f64) {
        let (month, day_of_week) = calendar_features(date);

        let n = self.quantities.len();
        let lag_1 = n.checked_sub(1).and_then(|i| self.quantities[i]);
        let lag_2 = n.checked_sub(2).and_then(|i| self.quantities[i]);

        self.dates.push(date);
        self.quantities.push(Some(prediction));
        self.lag_1.push(lag_1);
        self.lag_2.push(lag_2);
        self.month.push(Some(month));
        self.day_of_week.push(Some(day_of_week));
        self.synthetic.push(true);
    }

    fn into_frame(self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Series::new(DATE, self.dates.as_slice()),
            Series::new(QUANTITY, self.quantities),
            Series::new(LAG_1, self.lag_1),
            Series::new(LAG_2, self.lag_2),
            Series::new(MONTH, self.month),
            Series::new(DAY_OF_WEEK, self.day_of_week),
            Series::new(SYNTHETIC, self.synthetic),
        ])?;
        Ok(df)
    }
}

/// Lag-feature demand forecaster.
///
/// Generic over the regression and scaling capabilities; the defaults are a
/// [`RandomForestRegressor`] and a [`StandardScaler`].
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use demand_planning::{DemandForecaster, DemandSeries, ForecasterConfig, TrainingTarget};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let dates = (0..10).map(|i| start + chrono::Duration::days(i)).collect();
/// let history = DemandSeries::new(dates, vec![5., 6., 5., 7., 6., 8., 7., 9., 8., 10.]).unwrap();
///
/// let mut forecaster = DemandForecaster::new(ForecasterConfig::default()).unwrap();
/// forecaster.fit(history.dataframe(), TrainingTarget::FromColumn).unwrap();
/// let forecast = forecaster.predict(history.dataframe(), 3).unwrap();
/// assert_eq!(forecast.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DemandForecaster<R = RandomForestRegressor, S = StandardScaler> {
    regressor: R,
    scaler: S,
    lead_time: u32,
    is_fitted: bool,
}

impl DemandForecaster {
    /// Create an unfitted forecaster backed by a random forest
    pub fn new(config: ForecasterConfig) -> Result<Self> {
        let regressor = RandomForestRegressor::with_config(config.forest())?;
        Ok(Self::with_components(
            regressor,
            StandardScaler::new(),
            config.lead_time,
        ))
    }
}

impl Default for DemandForecaster {
    fn default() -> Self {
        Self::with_components(
            RandomForestRegressor::default(),
            StandardScaler::new(),
            ForecasterConfig::default().lead_time,
        )
    }
}

impl<R: Regressor, S: FeatureScaler> DemandForecaster<R, S> {
    /// Create an unfitted forecaster from explicit capabilities
    pub fn with_components(regressor: R, scaler: S, lead_time: u32) -> Self {
        Self {
            regressor,
            scaler,
            lead_time,
            is_fitted: false,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Days between order and delivery
    pub fn lead_time(&self) -> u32 {
        self.lead_time
    }

    pub fn regressor(&self) -> &R {
        &self.regressor
    }

    pub fn scaler(&self) -> &S {
        &self.scaler
    }

    /// Train the scaler and regressor on a demand history.
    ///
    /// Re-fitting replaces any previous fit. Returns `self` so a forecast can
    /// be chained directly.
    pub fn fit(&mut self, x: &DataFrame, target: TrainingTarget) -> Result<&mut Self> {
        data::ensure_chronological(&data::date_column(x)?)?;
        let training = assemble_training_frame(x, target)?;
        let prepared = features::build_features(&training)?;

        if prepared.height() == 0 {
            return Err(ForecastError::InsufficientDataError(format!(
                "No usable training rows after feature derivation ({} input rows, need at least 3)",
                x.height()
            )));
        }

        let feature_rows = features::feature_matrix(&prepared)?;
        let targets = features::target_vector(&prepared, TARGET)?;

        // Both capabilities keep their previous fit if the data is rejected
        let finite_features = feature_rows.iter().flatten().all(|v| v.is_finite());
        if !finite_features || targets.iter().any(|t| !t.is_finite()) {
            return Err(ForecastError::DataError(
                "Training features and targets must be finite".to_string(),
            ));
        }

        self.is_fitted = false;
        let scaled = self.scaler.fit_transform(&feature_rows)?;
        self.regressor.fit(&scaled, &targets)?;
        self.is_fitted = true;

        info!(
            model = self.regressor.name(),
            input_rows = x.height(),
            training_rows = feature_rows.len(),
            "fitted demand forecaster"
        );

        Ok(self)
    }

    /// Forecast `periods` days past the end of `x`.
    ///
    /// `x` seeds the rollout and must end in an observation with a full lag
    /// history (at least three rows, the last three quantities known).
    /// Invalid input is rejected before the first prediction is made.
    pub fn predict(&self, x: &DataFrame, periods: usize) -> Result<DemandForecast> {
        if !self.is_fitted {
            return Err(ForecastError::StateError(
                "Model must be fitted before prediction".to_string(),
            ));
        }

        let mut buffer = RolloutBuffer::seed(x)?;
        let last_date = match (buffer.latest_features(), buffer.last_date()) {
            (Some(_), Some(date)) => date,
            _ => {
                return Err(ForecastError::InsufficientDataError(format!(
                    "History of {} rows does not end in a complete observation",
                    buffer.len()
                )))
            }
        };
        let dates = future_dates(last_date, periods)?;

        debug!(seed_rows = buffer.len(), periods, "starting forecast rollout");

        let mut values = Vec::with_capacity(periods);

        // Each step reads the buffer before appending its own row
        for &date in &dates {
            let latest = buffer.latest_features().ok_or_else(|| {
                ForecastError::InsufficientDataError(
                    "Rollout buffer lost its lag history".to_string(),
                )
            })?;
            let scaled = self.scaler.transform(&[latest])?;
            let prediction = self.regressor.predict(&scaled[0])?;

            values.push(prediction);
            buffer.push_prediction(date, prediction);
        }

        Ok(DemandForecast {
            values,
            dates,
            rollout: buffer.into_frame()?,
        })
    }

    /// Forecast values only
    pub fn predict_values(&self, x: &DataFrame, periods: usize) -> Result<Vec<f64>> {
        Ok(self.predict(x, periods)?.into_values())
    }
}

/// Attach the training target as a `target` column.
///
/// Lags are derived from `quantity`; an explicit target only stands in for
/// it when the history has no `quantity` column of its own.
fn assemble_training_frame(x: &DataFrame, target: TrainingTarget) -> Result<DataFrame> {
    let has_quantity = x.get_column_names().contains(&QUANTITY);
    let mut training = x.clone();

    let target = match target {
        TrainingTarget::FromColumn => {
            if !has_quantity {
                debug!("fit called without a target column");
                return Err(ForecastError::ConfigurationError(format!(
                    "Missing target column '{}'; provide an explicit target instead",
                    QUANTITY
                )));
            }
            let mut series = x.column(QUANTITY)?.cast(&DataType::Float64)?;
            series.rename(TARGET);
            series
        }
        TrainingTarget::Explicit(values) => {
            if values.len() != x.height() {
                return Err(ForecastError::ConfigurationError(format!(
                    "Target length ({}) doesn't match history rows ({})",
                    values.len(),
                    x.height()
                )));
            }
            if !has_quantity {
                training.with_column(Series::new(QUANTITY, values.as_slice()))?;
            }
            Series::new(TARGET, values)
        }
    };
    training.with_column(target)?;

    Ok(training)
}
