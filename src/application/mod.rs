// Record set -> feature matrix + schema
pub mod feature_engineering;

// Feature scaling and ridge regression with cross-validated penalty
pub mod model_training;

// 7-day projection and best-day selection
pub mod forecasting;

// Volatility -> [0, 100] confidence index
pub mod confidence;

// Pipeline orchestrator and public entry points
pub mod engine;

// Consumer-side actionability policy
pub mod purchase_policy;
