//! Price-forecasting and recommendation engine for grocery price histories.
//!
//! The crate turns an irregular, sparse series of price observations into a
//! 7-day-ahead forecast, a confidence index and a structured recommendation.
//! Persistence, geocoding and rendering are external collaborators; they talk
//! to this engine only through [`domain::record::PriceRecord`] on the way in
//! and [`domain::recommendation::Recommendation`] on the way out.
//!
//! The entry points are blocking, CPU-bound computations with no I/O and no
//! shared state. Callers in responsiveness-sensitive contexts (UI threads)
//! should run them on a worker thread.

pub mod application;
pub mod domain;

pub use application::engine::{forecast, forecast_at, forecast_raw};
pub use application::purchase_policy::{PurchaseAdvice, PurchasePolicy};
pub use domain::errors::ForecastError;
pub use domain::record::{PriceRecord, RawPriceRecord};
pub use domain::recommendation::{Recommendation, RecommendationStatus};
