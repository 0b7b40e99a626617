use chrono::NaiveDate;
use demand_planning::data::{DATE, QUANTITY};
use demand_planning::{DemandSeries, ForecastError};
use polars::prelude::*;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
}

#[test]
fn test_demand_series_operations() {
    let dates = vec![day(1), day(2), day(3)];
    let data = DemandSeries::new(dates.clone(), vec![100.0, 103.0, 106.0]).unwrap();

    assert_eq!(data.len(), 3);
    assert!(!data.is_empty());
    assert_eq!(data.dates().unwrap(), dates);
    assert_eq!(data.last_date().unwrap(), day(3));

    let subset = data.tail(2);
    assert_eq!(subset.len(), 2);
    assert_eq!(subset.quantities().unwrap(), vec![103.0, 106.0]);

    let mean = data.mean().unwrap();
    assert!((mean - 103.0).abs() < 1e-12);

    // Sample standard deviation of 100, 103, 106
    let std_dev = data.std_dev().unwrap();
    assert!((std_dev - 3.0).abs() < 1e-12);
}

#[test]
fn test_length_mismatch_rejected() {
    let result = DemandSeries::new(vec![day(1), day(2)], vec![1.0]);
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_unordered_dates_rejected() {
    let result = DemandSeries::new(vec![day(2), day(1), day(3)], vec![1.0, 2.0, 3.0]);
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_repeated_dates_accepted() {
    let data = DemandSeries::new(vec![day(1), day(1), day(2)], vec![1.0, 2.0, 3.0]).unwrap();
    assert_eq!(data.len(), 3);
}

#[test]
fn test_from_dataframe_with_extra_columns() {
    let df = DataFrame::new(vec![
        Series::new(DATE, &[day(1), day(2)]),
        Series::new(QUANTITY, &[4i64, 5]),
        Series::new("store", &["north", "north"]),
    ])
    .unwrap();

    let data = DemandSeries::from_dataframe(df).unwrap();
    assert_eq!(data.quantities().unwrap(), vec![4.0, 5.0]);
    assert_eq!(data.dataframe().width(), 3);
}

#[test]
fn test_from_dataframe_requires_date_dtype() {
    let df = DataFrame::new(vec![
        Series::new(DATE, &["2023-01-01", "2023-01-02"]),
        Series::new(QUANTITY, &[1.0, 2.0]),
    ])
    .unwrap();

    assert!(matches!(
        DemandSeries::from_dataframe(df),
        Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_quantities_skip_nulls() {
    let df = DataFrame::new(vec![
        Series::new(DATE, &[day(1), day(2), day(3)]),
        Series::new(QUANTITY, &[Some(1.0), None, Some(3.0)]),
    ])
    .unwrap();

    let data = DemandSeries::from_dataframe(df).unwrap();
    assert_eq!(data.quantities().unwrap(), vec![1.0, 3.0]);
    assert!((data.mean().unwrap() - 2.0).abs() < 1e-12);
}

#[test]
fn test_statistics_need_data() {
    let data = DemandSeries::new(vec![day(1)], vec![5.0]).unwrap();
    assert!(data.mean().is_ok());
    assert!(matches!(
        data.std_dev(),
        Err(ForecastError::InsufficientDataError(_))
    ));
}
