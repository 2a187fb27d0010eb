//! Training the next-day close model.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use features::{CompanyEncoder, FeatureVector, derive_features};
use serde::{Deserialize, Serialize};
use tracing::info;
use types::TradeBar;

use crate::PriceModel;
use crate::error::Result;
use crate::evaluate::{Metrics, mean_absolute_error, r2_score, split_point};
use crate::forest::{ForestParams, RandomForestRegressor};
use crate::linear::LinearRegressor;

/// Which regressor to fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Linear,
    #[default]
    RandomForest,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::RandomForest => "random_forest",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(ModelKind::Linear),
            "random_forest" | "forest" | "rf" => Ok(ModelKind::RandomForest),
            other => Err(format!("unknown model kind '{other}'")),
        }
    }
}

/// Training settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub kind: ModelKind,
    /// Trailing share of rows, by date, held out for evaluation.
    pub test_fraction: f64,
    /// L2 penalty for the linear model.
    pub ridge: f64,
    pub forest: ForestParams,
    /// Grow forest trees on the rayon pool.
    pub parallel: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::default(),
            test_fraction: 0.2,
            ridge: 1e-6,
            forest: ForestParams::default(),
            parallel: true,
        }
    }
}

impl TrainConfig {
    pub fn with_kind(mut self, kind: ModelKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = test_fraction;
        self
    }

    pub fn with_forest(mut self, forest: ForestParams) -> Self {
        self.forest = forest;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// A fitted regressor of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Regressor {
    Linear(LinearRegressor),
    RandomForest(RandomForestRegressor),
}

impl Regressor {
    pub fn kind(&self) -> ModelKind {
        match self {
            Regressor::Linear(_) => ModelKind::Linear,
            Regressor::RandomForest(_) => ModelKind::RandomForest,
        }
    }

    fn as_model(&self) -> &dyn PriceModel {
        match self {
            Regressor::Linear(m) => m,
            Regressor::RandomForest(m) => m,
        }
    }
}

impl PriceModel for Regressor {
    fn predict(&self, features: &[f64]) -> f64 {
        self.as_model().predict(features)
    }

    fn name(&self) -> &str {
        self.as_model().name()
    }

    fn n_features(&self) -> usize {
        self.as_model().n_features()
    }
}

/// A regressor together with the encoder it was trained with.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    pub(crate) regressor: Regressor,
    pub(crate) encoder: CompanyEncoder,
    pub(crate) metrics: Option<Metrics>,
}

impl TrainedModel {
    pub fn regressor(&self) -> &Regressor {
        &self.regressor
    }

    pub fn encoder(&self) -> &CompanyEncoder {
        &self.encoder
    }

    /// Hold-out metrics; `None` when nothing was held out.
    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }
}

/// Fit a model on trade bars.
///
/// Features are derived per company; rows missing a lag, a trailing mean or
/// the next close are dropped. Samples are then ordered by date and the last
/// `test_fraction` of them is held out for MAE and R².
///
/// # Errors
/// Invalid settings, no usable rows, or a fit failure.
pub fn train(bars: &[TradeBar], config: &TrainConfig) -> Result<TrainedModel> {
    let encoder = CompanyEncoder::fit(bars.iter().map(|b| b.company.as_str()));
    let table = derive_features(bars, &encoder);

    let mut samples: Vec<(NaiveDate, FeatureVector, f64)> = table
        .rows()
        .iter()
        .filter_map(|r| r.training_sample().map(|(x, y)| (r.trade_date, x, y)))
        .collect();
    samples.sort_by_key(|s| s.0);
    let (x, y): (Vec<FeatureVector>, Vec<f64>) =
        samples.into_iter().map(|(_, x, y)| (x, y)).unzip();

    let n_train = split_point(x.len(), config.test_fraction)?;
    info!(
        companies = encoder.len(),
        bars = bars.len(),
        samples = x.len(),
        train = n_train,
        test = x.len() - n_train,
        kind = %config.kind,
        "training next-day close model"
    );

    let (x_train, x_test) = x.split_at(n_train);
    let (y_train, y_test) = y.split_at(n_train);
    let regressor = match config.kind {
        ModelKind::Linear => {
            Regressor::Linear(LinearRegressor::fit(x_train, y_train, config.ridge)?)
        }
        ModelKind::RandomForest => Regressor::RandomForest(RandomForestRegressor::fit(
            x_train,
            y_train,
            &config.forest,
            !config.parallel,
        )?),
    };

    let metrics = if x_test.is_empty() {
        None
    } else {
        let predicted: Vec<f64> = x_test.iter().map(|row| regressor.predict(row)).collect();
        let metrics = Metrics {
            n_train,
            n_test: x_test.len(),
            mae: mean_absolute_error(y_test, &predicted),
            r2: r2_score(y_test, &predicted),
        };
        info!(mae = metrics.mae, r2 = metrics.r2, "hold-out evaluation");
        if let (Some(p), Some(a)) = (predicted.last(), y_test.last()) {
            info!(predicted = p, actual = a, "last hold-out row");
        }
        Some(metrics)
    };

    Ok(TrainedModel {
        regressor,
        encoder,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use chrono::Days;

    fn trending(company: &str, n: u64, start: f64, step: f64) -> Vec<TradeBar> {
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                let close = start + step * i as f64;
                TradeBar {
                    company: company.to_string(),
                    trade_date: first + Days::new(i),
                    open: close - step,
                    high: close + 1.0,
                    low: close - 1.0 - step,
                    close,
                }
            })
            .collect()
    }

    #[test]
    fn test_model_kind_parse() {
        assert_eq!("linear".parse::<ModelKind>().unwrap(), ModelKind::Linear);
        assert_eq!(" RF ".parse::<ModelKind>().unwrap(), ModelKind::RandomForest);
        assert!("svm".parse::<ModelKind>().is_err());
        assert_eq!(ModelKind::RandomForest.to_string(), "random_forest");
    }

    #[test]
    fn test_linear_fits_linear_trend() {
        let mut bars = trending("TCS", 60, 100.0, 2.0);
        bars.extend(trending("INFY", 60, 500.0, -1.0));
        let config = TrainConfig::default().with_kind(ModelKind::Linear);
        let model = train(&bars, &config).unwrap();

        let metrics = model.metrics().unwrap();
        // 2 companies × (60 − 9 warm-up − 1 last) samples.
        assert_eq!(metrics.n_train + metrics.n_test, 100);
        assert_eq!(metrics.n_test, 20);
        assert!(metrics.mae < 0.5, "mae {}", metrics.mae);
        assert_eq!(model.regressor().kind(), ModelKind::Linear);
        assert_eq!(model.encoder().classes(), &["INFY", "TCS"]);
    }

    #[test]
    fn test_zero_test_fraction_skips_metrics() {
        let bars = trending("TCS", 40, 100.0, 1.0);
        let config = TrainConfig::default()
            .with_kind(ModelKind::Linear)
            .with_test_fraction(0.0);
        let model = train(&bars, &config).unwrap();
        assert!(model.metrics().is_none());
    }

    #[test]
    fn test_forest_trains_with_small_config() {
        let bars = trending("TCS", 80, 100.0, 1.5);
        let forest = ForestParams::default().with_trees(8).with_max_depth(3);
        let config = TrainConfig::default().with_forest(forest).with_parallel(false);
        let model = train(&bars, &config).unwrap();
        assert_eq!(model.regressor().kind(), ModelKind::RandomForest);
        assert_eq!(model.regressor().n_features(), features::N_FEATURES);
        assert!(model.metrics().unwrap().mae.is_finite());
    }

    #[test]
    fn test_too_few_bars() {
        let bars = trending("TCS", 10, 100.0, 1.0);
        assert!(matches!(
            train(&bars, &TrainConfig::default()),
            Err(ModelError::EmptyTrainingSet { rows: 0 })
        ));
    }
}
