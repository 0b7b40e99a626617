//! Lag and calendar feature derivation
//!
//! Every position in a demand history gets the same four features:
//! the quantity one and two steps earlier, the calendar month (1-12) and the
//! ISO weekday (Monday = 1 ... Sunday = 7). The first two positions of any
//! series have no full lag history and are dropped, as is any row whose lags
//! reach back to a null quantity.

use crate::data::{self, DATE, QUANTITY};
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

pub const LAG_1: &str = "lag_1";
pub const LAG_2: &str = "lag_2";
pub const MONTH: &str = "month";
pub const DAY_OF_WEEK: &str = "day_of_week";

/// Regressor inputs, in the order they are fed to the model
pub const FEATURE_COLUMNS: [&str; N_FEATURES] = [LAG_1, LAG_2, MONTH, DAY_OF_WEEK];

/// Number of features per time step
pub const N_FEATURES: usize = 4;

/// One row of regressor inputs: `[lag_1, lag_2, month, day_of_week]`
pub type FeatureVector = [f64; N_FEATURES];

/// Add lag and calendar columns without dropping incomplete rows.
///
/// Rows keep their order. The first two rows (and rows following a null
/// quantity) carry nulls in the lag columns.
pub fn with_lag_features(df: &DataFrame) -> Result<DataFrame> {
    // Surface missing or mistyped columns as data errors, not polars errors
    data::date_column(df)?;
    data::quantity_column(df, QUANTITY)?;

    let quantity = col(QUANTITY).cast(DataType::Float64);

    let out = df
        .clone()
        .lazy()
        .with_columns([
            quantity.clone().shift(1).alias(LAG_1),
            quantity.shift(2).alias(LAG_2),
            col(DATE).dt().month().cast(DataType::Float64).alias(MONTH),
            col(DATE).dt().weekday().cast(DataType::Float64).alias(DAY_OF_WEEK),
        ])
        .collect()?;

    Ok(out)
}

/// Derive the feature table for a demand history.
///
/// The input is left untouched; a series shorter than three rows yields an
/// empty table.
pub fn build_features(df: &DataFrame) -> Result<DataFrame> {
    let with_lags = with_lag_features(df)?;

    let subset = [QUANTITY, LAG_1, LAG_2, MONTH, DAY_OF_WEEK]
        .into_iter()
        .map(col)
        .collect::<Vec<_>>();

    let out = with_lags.lazy().drop_nulls(Some(subset)).collect()?;
    Ok(out)
}

/// Extract the `[lag_1, lag_2, month, day_of_week]` matrix from a feature table
pub fn feature_matrix(df: &DataFrame) -> Result<Vec<FeatureVector>> {
    let columns = FEATURE_COLUMNS
        .iter()
        .map(|name| data::quantity_column(df, name))
        .collect::<Result<Vec<_>>>()?;

    (0..df.height())
        .map(|row| {
            let mut features = [0.0; N_FEATURES];
            for (slot, column) in features.iter_mut().zip(&columns) {
                *slot = column[row].ok_or_else(|| {
                    ForecastError::DataError(format!("Incomplete feature row {}", row))
                })?;
            }
            Ok(features)
        })
        .collect()
}

/// Extract a non-null target column as plain values
pub fn target_vector(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    data::quantity_column(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| {
                ForecastError::DataError(format!("Missing target '{}' at row {}", name, row))
            })
        })
        .collect()
}

/// Calendar encoding shared by the feature table and synthesized forecast rows
pub fn calendar_features(date: NaiveDate) -> (f64, f64) {
    (
        f64::from(date.month()),
        f64::from(date.weekday().number_from_monday()),
    )
}
