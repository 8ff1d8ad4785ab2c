//! Fits the per-query price model: z-score feature scaling plus ridge
//! regression, with the penalty strength chosen by seeded k-fold
//! cross-validation over a fixed grid.
//!
//! The trained model is an ephemeral value: retrained from scratch on every
//! engine invocation, never persisted or shared.

use crate::application::feature_engineering::FeatureMatrix;
use crate::domain::errors::ForecastError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::ridge_regression::{RidgeRegression, RidgeRegressionParameters};
use statrs::statistics::{Data, Distribution};
use tracing::debug;

/// Fixed seed for cross-validation fold shuffling. Passing it explicitly
/// (rather than using process-wide random state) keeps every fit
/// reproducible for a given record set.
pub const CV_SEED: u64 = 42;

/// Candidate L2 penalty strengths. Ties in cross-validated error resolve to
/// the earlier grid entry.
const ALPHA_GRID: [f64; 3] = [0.1, 1.0, 10.0];

const MAX_FOLDS: usize = 5;

/// Per-column standardization parameters (z-score).
///
/// A zero-variance column maps to a constant 0 instead of dividing by zero;
/// that is the required handling for degenerate features, so they never
/// surface as errors.
#[derive(Debug, Clone)]
pub struct ColumnScaler {
    means: Vec<f64>,
    std_devs: Vec<f64>,
}

impl ColumnScaler {
    pub fn fit(x: &[Vec<f64>]) -> Self {
        let width = x.first().map_or(0, Vec::len);
        let mut means = Vec::with_capacity(width);
        let mut std_devs = Vec::with_capacity(width);

        for col in 0..width {
            let values: Vec<f64> = x.iter().map(|row| row[col]).collect();
            let single = values.len() < 2;
            let data = Data::new(values);
            means.push(data.mean().unwrap_or(0.0));
            std_devs.push(if single {
                0.0
            } else {
                data.std_dev().unwrap_or(0.0)
            });
        }

        Self { means, std_devs }
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.std_devs))
            .map(|(value, (mean, std_dev))| {
                if *std_dev > 0.0 {
                    (value - mean) / std_dev
                } else {
                    0.0
                }
            })
            .collect()
    }

    pub fn transform(&self, x: &[Vec<f64>]) -> Vec<Vec<f64>> {
        x.iter().map(|row| self.transform_row(row)).collect()
    }
}

type RidgeModel = RidgeRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Everything needed to score a future feature row consistently with the
/// training data: the fitted coefficients, the chosen penalty and the
/// scaling parameters.
pub struct TrainedModel {
    model: RidgeModel,
    pub alpha: f64,
    pub scaler: ColumnScaler,
}

impl TrainedModel {
    /// Scales unstandardized feature rows and scores them with the fitted
    /// model.
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ForecastError> {
        let scaled = self.scaler.transform(rows);
        predict_with(&self.model, scaled)
    }
}

/// Trains the ridge model on an engineered feature matrix (≥ 2 rows).
///
/// Columns are standardized once, then the penalty is picked by k-fold
/// cross-validation with `k = min(5, n)`, minimizing squared error over the
/// held-out folds. Fold assignment shuffles row indices with a `StdRng`
/// seeded from `seed`, so the whole fit is deterministic.
pub fn train(features: &FeatureMatrix, seed: u64) -> Result<TrainedModel, ForecastError> {
    let n = features.len();
    let scaler = ColumnScaler::fit(&features.x);
    let x = scaler.transform(&features.x);
    let y = &features.y;

    let k = MAX_FOLDS.min(n);
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut best_alpha = ALPHA_GRID[0];
    let mut best_mse = f64::INFINITY;
    for alpha in ALPHA_GRID {
        let mse = cross_validated_mse(&x, y, &indices, k, alpha)?;
        if mse < best_mse {
            best_mse = mse;
            best_alpha = alpha;
        }
    }

    debug!(alpha = best_alpha, mse = best_mse, folds = k, "selected ridge penalty");

    let model = fit_ridge(x, y.clone(), best_alpha)?;
    Ok(TrainedModel {
        model,
        alpha: best_alpha,
        scaler,
    })
}

/// Mean squared error over all held-out points of a k-fold split.
fn cross_validated_mse(
    x: &[Vec<f64>],
    y: &[f64],
    indices: &[usize],
    k: usize,
    alpha: f64,
) -> Result<f64, ForecastError> {
    let n = indices.len();
    let mut total_sq_err = 0.0;

    for fold in 0..k {
        let lo = fold * n / k;
        let hi = (fold + 1) * n / k;
        let holdout = &indices[lo..hi];
        if holdout.is_empty() {
            continue;
        }

        let train_idx: Vec<usize> = indices[..lo]
            .iter()
            .chain(&indices[hi..])
            .copied()
            .collect();

        let x_train: Vec<Vec<f64>> = train_idx.iter().map(|&i| x[i].clone()).collect();
        let y_train: Vec<f64> = train_idx.iter().map(|&i| y[i]).collect();
        let model = fit_ridge(x_train, y_train, alpha)?;

        let x_holdout: Vec<Vec<f64>> = holdout.iter().map(|&i| x[i].clone()).collect();
        let predictions = predict_with(&model, x_holdout)?;
        for (&i, pred) in holdout.iter().zip(&predictions) {
            total_sq_err += (pred - y[i]).powi(2);
        }
    }

    Ok(total_sq_err / n as f64)
}

fn fit_ridge(x: Vec<Vec<f64>>, y: Vec<f64>, alpha: f64) -> Result<RidgeModel, ForecastError> {
    let matrix = DenseMatrix::from_2d_vec(&x).map_err(|e| ForecastError::Model {
        reason: format!("matrix creation failed: {e}"),
    })?;
    RidgeRegression::fit(
        &matrix,
        &y,
        RidgeRegressionParameters::default().with_alpha(alpha),
    )
    .map_err(|e| ForecastError::Model {
        reason: format!("ridge fit failed: {e}"),
    })
}

fn predict_with(model: &RidgeModel, rows: Vec<Vec<f64>>) -> Result<Vec<f64>, ForecastError> {
    let matrix = DenseMatrix::from_2d_vec(&rows).map_err(|e| ForecastError::Model {
        reason: format!("matrix creation failed: {e}"),
    })?;
    model.predict(&matrix).map_err(|e| ForecastError::Model {
        reason: format!("prediction failed: {e}"),
    })
}
