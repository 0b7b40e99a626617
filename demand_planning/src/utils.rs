//! Utility functions for the demand_planning crate

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use polars::prelude::DataFrame;

/// Split a history chronologically into training and hold-out tables
pub fn train_test_split(df: &DataFrame, test_ratio: f64) -> (DataFrame, DataFrame) {
    let height = df.height();
    if height == 0 || test_ratio <= 0.0 || test_ratio >= 1.0 {
        return (df.clone(), df.head(Some(0)));
    }

    let test_size = (height as f64 * test_ratio).round() as usize;
    let train_size = height - test_size;

    (
        df.slice(0, train_size),
        df.slice(train_size as i64, test_size),
    )
}

/// The `horizon` calendar days following `last`
pub fn future_dates(last: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(horizon);
    let mut current = last;

    for _ in 0..horizon {
        current = current.succ_opt().ok_or_else(|| {
            ForecastError::DataError(format!("No calendar day after {}", current))
        })?;
        dates.push(current);
    }

    Ok(dates)
}

/// Mean and spread of a demand sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandStatistics {
    pub mean: f64,
    /// Sample standard deviation (n - 1); zero for a single value
    pub std_dev: f64,
}

/// Summary statistics a caller feeds into inventory calculations
pub fn demand_statistics(values: &[f64]) -> Result<DemandStatistics> {
    if values.is_empty() {
        return Err(ForecastError::InsufficientDataError(
            "Cannot summarize an empty demand sample".to_string(),
        ));
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std_dev = if values.len() > 1 {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    } else {
        0.0
    };

    Ok(DemandStatistics { mean, std_dev })
}
