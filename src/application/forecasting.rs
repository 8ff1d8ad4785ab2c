//! Projects the trained model 7 days forward and picks the cheapest day.

use crate::application::feature_engineering::FeatureSchema;
use crate::application::model_training::TrainedModel;
use crate::domain::errors::ForecastError;
use chrono::{Duration, NaiveDate};
use tracing::debug;

/// Candidate days, starting from the reference date itself (day 0).
pub const FORECAST_HORIZON_DAYS: usize = 7;

/// One scored candidate day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPrediction {
    pub date: NaiveDate,
    pub price: f64,
}

/// Scores the 7 candidate dates starting at `today` (inclusive).
///
/// Each candidate row is the last observed feature row with only its
/// temporal cells recomputed; rolling statistics stay frozen at the most
/// recent snapshot since no future observations exist to roll over.
pub fn project_week(
    model: &TrainedModel,
    schema: &FeatureSchema,
    last_row: &[f64],
    today: NaiveDate,
) -> Result<Vec<DayPrediction>, ForecastError> {
    let dates: Vec<NaiveDate> = (0..FORECAST_HORIZON_DAYS)
        .map(|offset| today + Duration::days(offset as i64))
        .collect();
    let rows: Vec<Vec<f64>> = dates
        .iter()
        .map(|date| schema.retime(last_row, *date))
        .collect();

    let prices = model.predict(&rows)?;
    let predictions: Vec<DayPrediction> = dates
        .into_iter()
        .zip(prices)
        .map(|(date, price)| DayPrediction { date, price })
        .collect();

    for p in &predictions {
        if !p.price.is_finite() {
            return Err(ForecastError::Model {
                reason: format!("non-finite prediction {} for {}", p.price, p.date),
            });
        }
        debug!(date = %p.date, price = p.price, "scored candidate day");
    }

    Ok(predictions)
}

/// The day with the minimum predicted price; ties break to the earliest
/// date. `None` only for an empty slice.
pub fn pick_best_day(predictions: &[DayPrediction]) -> Option<&DayPrediction> {
    let mut best: Option<&DayPrediction> = None;
    for candidate in predictions {
        match best {
            Some(current) if candidate.price >= current.price => {}
            _ => best = Some(candidate),
        }
    }
    best
}
