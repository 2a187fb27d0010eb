//! Next-day close price model.
//!
//! This crate provides:
//! - [`LinearRegressor`] and [`RandomForestRegressor`], both behind the
//!   [`PriceModel`] trait
//! - [`train`]: feature derivation, a date-ordered hold-out split, fitting and
//!   MAE/R² evaluation
//! - a JSON artifact ([`TrainedModel::save`] / [`TrainedModel::load`]) that
//!   stores the regressor with its company encoder
//! - [`Predictor`]: per-company next-close predictions with structured
//!   [`PredictError`]s
//!
//! # Usage
//!
//! ```ignore
//! use model::{Predictor, TrainConfig, train};
//!
//! let model = train(&bars, &TrainConfig::default())?;
//! model.save(Path::new("model/next_close.json"))?;
//!
//! let predictor = Predictor::new(model, &bars);
//! let prediction = predictor.predict_next("TCS")?;
//! println!("{} -> {:.2} ({})", prediction.close, prediction.predicted_close, prediction.trend);
//! ```

pub mod artifact;
pub mod error;
pub mod evaluate;
pub mod forest;
pub mod linear;
pub mod predictor;
pub mod train;
pub mod tree;

pub use error::{ModelError, PredictError, Result};
pub use evaluate::{Metrics, mean_absolute_error, r2_score, split_point};
pub use forest::{ForestParams, RandomForestRegressor};
pub use linear::LinearRegressor;
pub use predictor::{Prediction, Predictor, Trend};
pub use train::{ModelKind, Regressor, TrainConfig, TrainedModel, train};
pub use tree::{RegressionTree, TreeNode, TreeParams};

/// A regression model over a fixed-width feature vector.
///
/// Implementors must be `Send + Sync` so a predictor can be shared across
/// threads.
pub trait PriceModel: Send + Sync {
    /// Predicted next-day close for one feature vector.
    fn predict(&self, features: &[f64]) -> f64;

    /// Short identifier used in logs and artifacts.
    fn name(&self) -> &str;

    /// Number of features the model expects.
    fn n_features(&self) -> usize;
}
