use crate::domain::errors::ForecastError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single validated price observation for one grocery item.
///
/// Records are immutable once constructed; the engine never writes back to
/// its input and keeps any derived columns in a private working copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub price: Decimal,
    pub supermarket: String,
    pub brand: Option<String>,
    pub location: String,
    pub weight_grams: Option<f64>,
}

impl PriceRecord {
    /// Price per gram, when a positive weight is known.
    ///
    /// Presentation-layer convenience (the history table shows €/g); the
    /// forecasting pipeline does not use it.
    pub fn unit_price(&self) -> Option<Decimal> {
        let grams = self.weight_grams.filter(|w| *w > 0.0)?;
        let grams = Decimal::from_f64_retain(grams)?;
        if grams.is_zero() {
            return None;
        }
        Some(self.price / grams)
    }

    /// Validates a raw storage row into a typed record.
    ///
    /// Fails fast on an unparsable date or a non-numeric price so that no
    /// partial computation runs on corrupt input. `row` is the zero-based
    /// position of the row in the batch, reported back in the error.
    pub fn from_raw(raw: &RawPriceRecord, row: usize) -> Result<Self, ForecastError> {
        let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d").map_err(|e| {
            ForecastError::MalformedRecord {
                row,
                reason: format!("invalid date '{}': {}", raw.date, e),
            }
        })?;

        let price: Decimal =
            raw.price
                .trim()
                .parse()
                .map_err(|e| ForecastError::MalformedRecord {
                    row,
                    reason: format!("invalid price '{}': {}", raw.price, e),
                })?;

        Ok(Self {
            date,
            price,
            supermarket: raw.supermarket.clone(),
            brand: raw.brand.clone(),
            location: raw.location.clone(),
            weight_grams: raw.weight_grams,
        })
    }
}

/// The untyped row shape a persistence collaborator hands over.
///
/// Dates and prices arrive as strings; [`PriceRecord::from_raw`] is the only
/// way across the boundary, so malformed rows are rejected before any
/// feature engineering starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPriceRecord {
    pub date: String,
    pub price: String,
    pub supermarket: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub location: String,
    #[serde(default)]
    pub weight_grams: Option<f64>,
}
