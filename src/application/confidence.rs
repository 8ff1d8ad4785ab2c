//! Reliability score derived from recent price volatility.

use statrs::statistics::{Data, Distribution};

/// Maps the engineered `price_volatility` column to a confidence index in
/// [0, 100]: 100 for a perfectly stable price, otherwise
/// `clamp(100 - 50 * mean_volatility, 0, 100)`.
///
/// The linear scaling is a heuristic kept for compatibility with the rest of
/// the system, not a statistically calibrated interval; it reaches 0 well
/// before volatility is "high" in absolute terms. It is monotonically
/// non-increasing in mean volatility and always stays inside the bounds.
pub fn confidence_index(price_volatility: &[f64]) -> f64 {
    let mean_volatility = Data::new(price_volatility.to_vec())
        .mean()
        .unwrap_or(0.0);
    if mean_volatility == 0.0 {
        return 100.0;
    }
    (100.0 - 50.0 * mean_volatility).clamp(0.0, 100.0)
}
