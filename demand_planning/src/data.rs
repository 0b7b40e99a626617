//! Demand history handling
//!
//! History tables are polars `DataFrame`s with a `date` column of dtype
//! `Date` and a numeric `quantity` column. Any other columns are carried
//! along untouched.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use polars::prelude::*;

/// Name of the date column
pub const DATE: &str = "date";
/// Name of the observed demand column
pub const QUANTITY: &str = "quantity";

/// Days from 0001-01-01 (CE) to 1970-01-01, the epoch of polars `Date` values
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Validated demand history for a single item
#[derive(Debug, Clone)]
pub struct DemandSeries {
    df: DataFrame,
}

impl DemandSeries {
    /// Create a series from parallel vectors of dates and quantities
    pub fn new(dates: Vec<NaiveDate>, quantities: Vec<f64>) -> Result<Self> {
        if dates.len() != quantities.len() {
            return Err(ForecastError::DataError(format!(
                "Dates length ({}) doesn't match quantities length ({})",
                dates.len(),
                quantities.len()
            )));
        }

        let date_series = Series::new(DATE, dates.as_slice());
        let quantity_series = Series::new(QUANTITY, quantities);
        let df = DataFrame::new(vec![date_series, quantity_series])?;

        Self::from_dataframe(df)
    }

    /// Wrap an existing DataFrame after checking its date and quantity columns
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        let dates = date_column(&df)?;
        ensure_chronological(&dates)?;
        quantity_column(&df, QUANTITY)?;

        Ok(Self { df })
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_dataframe(self) -> DataFrame {
        self.df
    }

    /// Observation dates in table order
    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        date_column(&self.df)
    }

    /// Known quantities in table order; null observations are skipped
    pub fn quantities(&self) -> Result<Vec<f64>> {
        Ok(quantity_column(&self.df, QUANTITY)?
            .into_iter()
            .flatten()
            .collect())
    }

    /// Date of the most recent observation
    pub fn last_date(&self) -> Result<NaiveDate> {
        self.dates()?
            .last()
            .copied()
            .ok_or_else(|| ForecastError::DataError("Empty demand series".to_string()))
    }

    /// The most recent `n` observations
    pub fn tail(&self, n: usize) -> Self {
        Self {
            df: self.df.tail(Some(n)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Mean of the known quantities
    pub fn mean(&self) -> Result<f64> {
        let quantities = self.quantities()?;
        if quantities.is_empty() {
            return Err(ForecastError::InsufficientDataError(
                "No quantities available".to_string(),
            ));
        }

        Ok(quantities.iter().sum::<f64>() / quantities.len() as f64)
    }

    /// Sample standard deviation (n - 1) of the known quantities
    pub fn std_dev(&self) -> Result<f64> {
        let quantities = self.quantities()?;
        if quantities.len() < 2 {
            return Err(ForecastError::InsufficientDataError(
                "Need at least two quantities for a standard deviation".to_string(),
            ));
        }

        let mean = quantities.iter().sum::<f64>() / quantities.len() as f64;
        let variance = quantities
            .iter()
            .map(|q| (q - mean).powi(2))
            .sum::<f64>()
            / (quantities.len() - 1) as f64;

        Ok(variance.sqrt())
    }
}

/// Read the `date` column as calendar days. Nulls are rejected.
pub fn date_column(df: &DataFrame) -> Result<Vec<NaiveDate>> {
    let col = df.column(DATE).map_err(|e| {
        ForecastError::DataError(format!("Column '{}' not found: {}", DATE, e))
    })?;

    if col.dtype() != &DataType::Date {
        return Err(ForecastError::DataError(format!(
            "Column '{}' must have dtype Date, found {}",
            DATE,
            col.dtype()
        )));
    }

    let days = col.cast(&DataType::Int32)?;
    days.i32()?
        .into_iter()
        .enumerate()
        .map(|(row, day)| {
            day.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + UNIX_EPOCH_DAYS_FROM_CE))
                .ok_or_else(|| {
                    ForecastError::DataError(format!("Missing or invalid date at row {}", row))
                })
        })
        .collect()
}

/// Read a numeric column as `f64`, keeping nulls
pub fn quantity_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let col = df.column(name).map_err(|e| {
        ForecastError::DataError(format!("Column '{}' not found: {}", name, e))
    })?;

    if !col.dtype().is_numeric() {
        return Err(ForecastError::DataError(format!(
            "Column '{}' cannot be converted to f64",
            name
        )));
    }

    let cast = col.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

/// Lag features are only meaningful when rows are in date order
pub fn ensure_chronological(dates: &[NaiveDate]) -> Result<()> {
    if let Some(row) = dates.windows(2).position(|w| w[1] < w[0]) {
        return Err(ForecastError::DataError(format!(
            "Dates must be in non-decreasing order; {} follows {} at row {}",
            dates[row + 1],
            dates[row],
            row + 1
        )));
    }
    Ok(())
}
