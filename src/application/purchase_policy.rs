//! Consumer-side classification of a recommendation.
//!
//! The engine reports *what* it predicts; whether that is worth acting on
//! today is presentation policy. The threshold lives here, configurable,
//! instead of being baked into the engine's return type.

use crate::domain::recommendation::{Recommendation, RecommendationStatus, weekday_name};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Actionability policy for a host application.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PurchasePolicy {
    /// Minimum confidence required before a "buy today" verdict.
    pub min_confidence: f64,
}

impl Default for PurchasePolicy {
    fn default() -> Self {
        Self { min_confidence: 70.0 }
    }
}

/// The policy's verdict on one recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseAdvice {
    /// True when the forecast is trustworthy enough and the cheapest
    /// predicted day is today.
    pub buy_now: bool,
    /// Expected cost of ignoring the recommendation: average price minus the
    /// predicted best price. Negative when the model expects prices to rise
    /// above the historical average.
    pub potential_savings: Option<Decimal>,
}

impl PurchasePolicy {
    pub fn evaluate(&self, recommendation: &Recommendation, today: NaiveDate) -> PurchaseAdvice {
        let buy_now = recommendation.status == RecommendationStatus::Ok
            && recommendation.confidence >= self.min_confidence
            && recommendation.best_day.as_deref() == Some(weekday_name(today.weekday()));

        let potential_savings = match (recommendation.average_price, recommendation.predicted_price)
        {
            (Some(average), Some(predicted)) => Some(average - predicted),
            _ => None,
        };

        PurchaseAdvice {
            buy_now,
            potential_savings,
        }
    }
}
