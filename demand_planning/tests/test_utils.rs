use chrono::{Duration, NaiveDate};
use demand_planning::utils::{future_dates, train_test_split};
use demand_planning::{demand_statistics, DemandSeries, ForecastError};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn history(len: usize) -> DemandSeries {
    let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    let dates = (0..len as i64).map(|i| start + Duration::days(i)).collect();
    let quantities = (0..len).map(|i| i as f64).collect();
    DemandSeries::new(dates, quantities).unwrap()
}

#[test]
fn test_future_dates_cross_month_and_year() {
    let last = NaiveDate::from_ymd_opt(2023, 12, 30).unwrap();
    let dates = future_dates(last, 3).unwrap();

    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        ]
    );
    assert!(future_dates(last, 0).unwrap().is_empty());
}

#[test]
fn test_future_dates_past_calendar_end() {
    assert!(matches!(
        future_dates(NaiveDate::MAX, 1),
        Err(ForecastError::DataError(_))
    ));
}

#[rstest]
#[case(10, 0.2, 8, 2)]
#[case(10, 0.25, 7, 3)]
#[case(10, 0.0, 10, 0)]
#[case(10, 1.0, 10, 0)]
#[case(0, 0.5, 0, 0)]
fn test_train_test_split(
    #[case] len: usize,
    #[case] ratio: f64,
    #[case] train_len: usize,
    #[case] test_len: usize,
) {
    let data = history(len);
    let (train, test) = train_test_split(data.dataframe(), ratio);
    assert_eq!(train.height(), train_len);
    assert_eq!(test.height(), test_len);
}

#[test]
fn test_train_test_split_is_chronological() {
    let data = history(10);
    let (train, test) = train_test_split(data.dataframe(), 0.3);

    let train = DemandSeries::from_dataframe(train).unwrap();
    let test = DemandSeries::from_dataframe(test).unwrap();
    assert!(train.last_date().unwrap() < test.dates().unwrap()[0]);
    assert_eq!(test.quantities().unwrap(), vec![7.0, 8.0, 9.0]);
}

#[test]
fn test_demand_statistics() {
    let stats = demand_statistics(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    assert!((stats.mean - 5.0).abs() < 1e-12);
    // Sample variance 32 / 7
    assert!((stats.std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);

    let single = demand_statistics(&[42.0]).unwrap();
    assert_eq!(single.mean, 42.0);
    assert_eq!(single.std_dev, 0.0);

    assert!(matches!(
        demand_statistics(&[]),
        Err(ForecastError::InsufficientDataError(_))
    ));
}
