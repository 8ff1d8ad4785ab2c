//! Turns a set of price records into a numeric feature matrix.
//!
//! Every row is built through an explicit [`FeatureSchema`] so the training
//! matrix and any later forecast rows share an identical column set and
//! order. The schema is captured once per engine invocation from the values
//! present in the supplied records; there is no external vocabulary.

use crate::domain::record::PriceRecord;
use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::*;
use statrs::statistics::{Data, Distribution};
use std::collections::BTreeSet;
use tracing::debug;

/// Price history shorter than a week uses the full history as the window.
const ROLLING_WINDOW: usize = 7;

/// One column of the feature matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureColumn {
    DayOfYear,
    DayOfWeek,
    Month,
    RollingAvg,
    PriceVolatility,
    WeightGrams,
    Brand(String),
    Supermarket(String),
    Location(String),
}

/// Ordered column layout, fixed for the lifetime of one engine invocation.
///
/// Numeric columns come first in a fixed order; one-hot columns follow,
/// alphabetical within each category. Alphabetical ordering makes the layout
/// independent of the order records arrive in.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    pub fn from_records(records: &[PriceRecord]) -> Self {
        let mut brands = BTreeSet::new();
        let mut supermarkets = BTreeSet::new();
        let mut locations = BTreeSet::new();
        for rec in records {
            if let Some(brand) = &rec.brand {
                brands.insert(brand.clone());
            }
            supermarkets.insert(rec.supermarket.clone());
            locations.insert(rec.location.clone());
        }

        let mut columns = vec![
            FeatureColumn::DayOfYear,
            FeatureColumn::DayOfWeek,
            FeatureColumn::Month,
            FeatureColumn::RollingAvg,
            FeatureColumn::PriceVolatility,
            FeatureColumn::WeightGrams,
        ];
        columns.extend(brands.into_iter().map(FeatureColumn::Brand));
        columns.extend(supermarkets.into_iter().map(FeatureColumn::Supermarket));
        columns.extend(locations.into_iter().map(FeatureColumn::Location));

        Self { columns }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn position(&self, column: &FeatureColumn) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Builds the feature row for one record, given its rolling statistics.
    fn row(&self, rec: &PriceRecord, rolling_avg: f64, volatility: f64) -> Vec<f64> {
        self.columns
            .iter()
            .map(|col| match col {
                FeatureColumn::DayOfYear => rec.date.ordinal() as f64,
                FeatureColumn::DayOfWeek => rec.date.weekday().num_days_from_monday() as f64,
                FeatureColumn::Month => rec.date.month() as f64,
                FeatureColumn::RollingAvg => rolling_avg,
                FeatureColumn::PriceVolatility => volatility,
                FeatureColumn::WeightGrams => rec.weight_grams.unwrap_or(0.0),
                FeatureColumn::Brand(b) => one_hot(rec.brand.as_deref() == Some(b.as_str())),
                FeatureColumn::Supermarket(s) => one_hot(rec.supermarket == *s),
                FeatureColumn::Location(l) => one_hot(rec.location == *l),
            })
            .collect()
    }

    /// Copies a base row, recomputing only the temporal cells for `date`.
    ///
    /// Used by the forecaster: rolling statistics, weight and one-hot flags
    /// stay frozen at their last observed values because no future prices
    /// exist to roll over. A deliberate approximation, not an oversight.
    pub fn retime(&self, base: &[f64], date: NaiveDate) -> Vec<f64> {
        self.columns
            .iter()
            .zip(base)
            .map(|(col, value)| match col {
                FeatureColumn::DayOfYear => date.ordinal() as f64,
                FeatureColumn::DayOfWeek => date.weekday().num_days_from_monday() as f64,
                FeatureColumn::Month => date.month() as f64,
                _ => *value,
            })
            .collect()
    }
}

fn one_hot(set: bool) -> f64 {
    if set { 1.0 } else { 0.0 }
}

/// Feature matrix plus target vector, rows keyed 1:1 to the sorted records.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub schema: FeatureSchema,
    pub x: Vec<Vec<f64>>,
    pub y: Vec<f64>,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Extracts one named column from the matrix.
    pub fn column(&self, column: &FeatureColumn) -> Vec<f64> {
        match self.schema.position(column) {
            Some(idx) => self.x.iter().map(|row| row[idx]).collect(),
            None => Vec::new(),
        }
    }

    /// The per-row rolling sample standard deviation of price.
    pub fn price_volatility(&self) -> Vec<f64> {
        self.column(&FeatureColumn::PriceVolatility)
    }
}

/// Engineers the full feature matrix from a record set.
///
/// Records are stable-sorted ascending by date (ties keep their supplied
/// order) and never mutated; all derived values live in the returned matrix.
pub fn build_features(records: &[PriceRecord]) -> FeatureMatrix {
    let mut sorted: Vec<&PriceRecord> = records.iter().collect();
    sorted.sort_by_key(|rec| rec.date);

    let schema = FeatureSchema::from_records(records);
    let prices: Vec<f64> = sorted
        .iter()
        .map(|rec| rec.price.to_f64().unwrap_or(0.0))
        .collect();

    let window = ROLLING_WINDOW.min(prices.len());
    let mut x = Vec::with_capacity(sorted.len());
    for (i, rec) in sorted.iter().enumerate() {
        let (avg, vol) = rolling_stats(&prices, i, window);
        x.push(schema.row(rec, avg, vol));
    }

    debug!(
        rows = x.len(),
        columns = schema.width(),
        "engineered feature matrix"
    );

    FeatureMatrix { schema, x, y: prices }
}

/// Rolling mean and sample standard deviation over the trailing window
/// ending at row `i` (inclusive). The deviation is 0 whenever the window
/// holds fewer than 2 observations, never NaN.
fn rolling_stats(prices: &[f64], i: usize, window: usize) -> (f64, f64) {
    let start = (i + 1).saturating_sub(window);
    let slice = &prices[start..=i];
    let data = Data::new(slice.to_vec());
    let mean = data.mean().unwrap_or(0.0);
    let std_dev = if slice.len() < 2 {
        0.0
    } else {
        data.std_dev().unwrap_or(0.0)
    };
    (mean, std_dev)
}
