use chrono::{Duration, NaiveDate};
use sctk::demand_planning::utils::train_test_split;
use sctk::{
    observability, plan_inventory, DemandForecaster, DemandSeries, ForecasterConfig,
    InventoryOptimizer, TrainingTarget,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init();

    // Eight weeks of daily sales with a weekend bump
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("invalid start date")?;
    let dates: Vec<NaiveDate> = (0..56).map(|i| start + Duration::days(i)).collect();
    let quantities: Vec<f64> = (0..56)
        .map(|i| {
            let weekend = if i % 7 >= 5 { 6.0 } else { 0.0 };
            20.0 + weekend + (i % 3) as f64
        })
        .collect();
    let history = DemandSeries::new(dates, quantities)?;

    let config = ForecasterConfig {
        seed: Some(7),
        ..ForecasterConfig::default()
    };
    // Hold out the last two weeks to compare against the forecast
    let (train, holdout) = train_test_split(history.dataframe(), 0.25);
    let train = DemandSeries::from_dataframe(train)?;
    let holdout = DemandSeries::from_dataframe(holdout)?;

    let mut forecaster = DemandForecaster::new(config)?;
    forecaster.fit(train.dataframe(), TrainingTarget::FromColumn)?;

    let forecast = forecaster.predict(train.tail(14).dataframe(), holdout.len())?;
    println!("Forecast for the next {} days:", forecast.len());
    let actual = holdout.quantities()?;
    for ((date, value), observed) in forecast.dates().iter().zip(forecast.values()).zip(&actual) {
        println!("  {}: {:>6.2} (actual {:.0})", date, value, observed);
    }

    let optimizer = InventoryOptimizer::new(forecaster.lead_time(), 0.95)?;
    let policy = plan_inventory(forecast.values(), &optimizer)?;
    println!("Safety stock:  {:.2}", policy.safety_stock);
    println!("Reorder point: {:.2}", policy.reorder_point);

    Ok(())
}
