use approx::assert_abs_diff_eq;
use chrono::{Duration, NaiveDate};
use sctk::{
    plan_inventory, DemandForecaster, DemandSeries, ForecasterConfig, InventoryConfig,
    InventoryOptimizer, PlanningError, TrainingTarget,
};

fn weekly_history(days: i64) -> DemandSeries {
    let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let dates = (0..days).map(|i| start + Duration::days(i)).collect();
    let quantities = (0..days)
        .map(|i| if i % 7 >= 5 { 30.0 } else { 20.0 })
        .collect();
    DemandSeries::new(dates, quantities).unwrap()
}

#[test]
fn test_forecast_then_plan() {
    let history = weekly_history(42);
    let config = ForecasterConfig {
        n_estimators: 30,
        lead_time: 5,
        seed: Some(1),
        ..ForecasterConfig::default()
    };

    let mut forecaster = DemandForecaster::new(config).unwrap();
    forecaster
        .fit(history.dataframe(), TrainingTarget::FromColumn)
        .unwrap();

    let forecast = forecaster.predict(history.tail(7).dataframe(), 7).unwrap();
    assert_eq!(forecast.len(), 7);
    assert_eq!(
        forecast.dates()[0],
        history.last_date().unwrap() + Duration::days(1)
    );
    // Every prediction is an average of observed quantities
    assert!(forecast.values().iter().all(|v| (20.0..=30.0).contains(v)));

    let optimizer = InventoryOptimizer::new(forecaster.lead_time(), 0.95).unwrap();
    let policy = plan_inventory(forecast.values(), &optimizer).unwrap();

    let stats = forecast.statistics().unwrap();
    assert_abs_diff_eq!(
        policy.safety_stock,
        optimizer.z_score() * stats.std_dev * 5f64.sqrt(),
        epsilon = 1e-9
    );
    assert_abs_diff_eq!(
        policy.reorder_point,
        stats.mean * 5.0 + policy.safety_stock,
        epsilon = 1e-9
    );
}

#[test]
fn test_plan_from_recent_history() {
    let history = weekly_history(14);
    let quantities = history.quantities().unwrap();

    let config: InventoryConfig =
        serde_json::from_str(r#"{"lead_time": 3, "service_level": 0.99}"#).unwrap();
    let optimizer = InventoryOptimizer::from_config(&config).unwrap();
    let policy = plan_inventory(&quantities, &optimizer).unwrap();

    assert!(policy.safety_stock > 0.0);
    assert!(policy.reorder_point > policy.safety_stock);
}

#[test]
fn test_invalid_service_level_surfaces() {
    let result = InventoryOptimizer::new(7, 1.5).map_err(PlanningError::from);
    assert!(matches!(result, Err(PlanningError::Inventory(_))));
}
