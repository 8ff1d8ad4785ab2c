use thiserror::Error;

/// Errors surfaced by the forecasting engine.
///
/// Too-few-records is deliberately *not* an error: the engine recovers from
/// it locally by returning a degenerate recommendation (see
/// [`crate::domain::recommendation::Recommendation::insufficient_data`]).
/// Zero-variance feature columns are likewise absorbed by the scaling policy
/// in the model trainer and never reach the caller.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("malformed record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("model fitting failed: {reason}")]
    Model { reason: String },
}
