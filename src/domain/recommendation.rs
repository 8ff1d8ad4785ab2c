use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationStatus {
    Ok,
    InsufficientData,
}

/// The engine's output contract.
///
/// `confidence` is a bounded [0, 100] heuristic inversely related to recent
/// price volatility, not a calibrated statistical interval. Whether a
/// recommendation is *actionable* (e.g. "buy today") is consumer policy, see
/// [`crate::application::purchase_policy::PurchasePolicy`]; it is deliberately
/// not part of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub status: RecommendationStatus,
    /// Full weekday name of the cheapest predicted day, e.g. "Monday".
    pub best_day: Option<String>,
    pub predicted_price: Option<Decimal>,
    /// Reliability score in [0, 100].
    pub confidence: f64,
    pub average_price: Option<Decimal>,
}

impl Recommendation {
    /// The degenerate result for histories with fewer than 2 usable records.
    pub fn insufficient_data() -> Self {
        Self {
            status: RecommendationStatus::InsufficientData,
            best_day: None,
            predicted_price: None,
            confidence: 0.0,
            average_price: None,
        }
    }
}

/// Full English weekday name, matching what the presentation layer prints.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
