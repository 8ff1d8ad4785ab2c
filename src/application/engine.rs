//! Pipeline orchestrator: records -> features -> model -> 7-day forecast ->
//! confidence -> recommendation.

use crate::application::confidence::confidence_index;
use crate::application::feature_engineering::build_features;
use crate::application::forecasting::{pick_best_day, project_week};
use crate::application::model_training::{CV_SEED, train};
use crate::domain::errors::ForecastError;
use crate::domain::record::{PriceRecord, RawPriceRecord};
use crate::domain::recommendation::{Recommendation, RecommendationStatus, weekday_name};
use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Anything below this yields the degenerate recommendation instead of a fit.
const MIN_RECORDS: usize = 2;

/// Produces a buy recommendation from an item's price history, forecasting
/// the 7 days starting today.
///
/// Blocking and CPU-bound; no I/O, no shared state, no retained data. The
/// input slice is only read. Callers on a responsiveness-sensitive thread
/// should move the call to a worker and impose any deadline externally.
pub fn forecast(records: &[PriceRecord]) -> Result<Recommendation, ForecastError> {
    forecast_at(records, Local::now().date_naive())
}

/// [`forecast`] with an explicit reference date as forecast day 0.
///
/// For a fixed `today` and an unmodified record set the result is
/// bit-identical across calls.
pub fn forecast_at(records: &[PriceRecord], today: NaiveDate) -> Result<Recommendation, ForecastError> {
    if records.len() < MIN_RECORDS {
        warn!(records = records.len(), "not enough history to forecast");
        return Ok(Recommendation::insufficient_data());
    }

    let features = build_features(records);
    let trained = train(&features, CV_SEED)?;
    let last_row = &features.x[features.len() - 1];
    let predictions = project_week(&trained, &features.schema, last_row, today)?;
    let best = pick_best_day(&predictions).ok_or_else(|| ForecastError::Model {
        reason: "empty forecast horizon".to_string(),
    })?;

    let confidence = confidence_index(&features.price_volatility());
    let predicted_price =
        Decimal::from_f64_retain(best.price).ok_or_else(|| ForecastError::Model {
            reason: format!("unrepresentable prediction {}", best.price),
        })?;

    debug!(
        best_day = %best.date,
        predicted = best.price,
        confidence,
        "forecast complete"
    );

    Ok(Recommendation {
        status: RecommendationStatus::Ok,
        best_day: Some(weekday_name(best.date.weekday()).to_string()),
        predicted_price: Some(predicted_price),
        confidence,
        average_price: Some(average_price(records)),
    })
}

/// Validates raw storage rows, then forecasts.
///
/// Fails fast: a single malformed row rejects the whole batch before any
/// feature engineering runs.
pub fn forecast_raw(rows: &[RawPriceRecord]) -> Result<Recommendation, ForecastError> {
    let records = rows
        .iter()
        .enumerate()
        .map(|(row, raw)| PriceRecord::from_raw(raw, row))
        .collect::<Result<Vec<_>, _>>()?;
    forecast(&records)
}

fn average_price(records: &[PriceRecord]) -> Decimal {
    let total: Decimal = records.iter().map(|rec| rec.price).sum();
    total / Decimal::from(records.len() as u64)
}
