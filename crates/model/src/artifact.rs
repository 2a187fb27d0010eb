//! JSON model artifact.
//!
//! # Format (linear)
//!
//! ```json
//! {
//!   "model_type": "linear",
//!   "n_features": 9,
//!   "feature_names": ["company_encoded", "open", "high", "low", "close",
//!                     "prev_close", "ma_5", "ma_10", "volatility"],
//!   "companies": ["ADANIENT", "ADANIPORTS", "..."],
//!   "metrics": { "n_train": 92000, "n_test": 23000, "mae": 11.8, "r2": 0.998 },
//!   "coefficients": [0.0, -0.1, 0.2, 0.1, 0.9, 0.0, 0.0, 0.0, 0.0],
//!   "intercept": 0.4
//! }
//! ```
//!
//! # Format (random forest)
//!
//! Same header, with `"model_type": "random_forest"` and a `trees` array of
//! `{ "n_nodes": .., "nodes": [..] }` in the node format of [`crate::tree`].

use std::path::Path;

use features::{CompanyEncoder, FEATURE_NAMES, N_FEATURES};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::PriceModel;
use crate::error::{ModelError, Result};
use crate::evaluate::Metrics;
use crate::forest::RandomForestRegressor;
use crate::linear::LinearRegressor;
use crate::train::{ModelKind, Regressor, TrainedModel};
use crate::tree::{RegressionTree, TreeJson};

#[derive(Debug, Serialize, Deserialize)]
struct ArtifactJson {
    model_type: String,
    n_features: usize,
    feature_names: Vec<String>,
    companies: CompanyEncoder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metrics: Option<Metrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coefficients: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    intercept: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trees: Option<Vec<TreeJson>>,
}

impl TrainedModel {
    /// Serialize to the artifact JSON.
    pub fn to_json_string(&self) -> Result<String> {
        let mut json = ArtifactJson {
            model_type: self.regressor.kind().as_str().to_string(),
            n_features: self.regressor.n_features(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            companies: self.encoder.clone(),
            metrics: self.metrics,
            coefficients: None,
            intercept: None,
            trees: None,
        };
        match &self.regressor {
            Regressor::Linear(m) => {
                json.coefficients = Some(m.coefficients().to_vec());
                json.intercept = Some(m.intercept());
            }
            Regressor::RandomForest(m) => {
                json.trees = Some(m.trees().iter().map(RegressionTree::to_json).collect());
            }
        }
        Ok(serde_json::to_string_pretty(&json)?)
    }

    /// Write the artifact, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ModelError::io(parent, e))?;
        }
        let json = self.to_json_string()?;
        std::fs::write(path, json).map_err(|e| ModelError::io(path, e))?;
        info!(path = %path.display(), kind = %self.regressor.kind(), "model saved");
        Ok(())
    }

    /// Load an artifact written by [`TrainedModel::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
        Self::from_json_str(&content)
    }

    /// Parse and validate artifact JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let parsed: ArtifactJson = serde_json::from_str(json)?;
        let invalid = |msg: String| ModelError::InvalidArtifact(msg);

        let kind: ModelKind = parsed.model_type.parse().map_err(|_| {
            invalid(format!(
                "expected model_type 'linear' or 'random_forest', got '{}'",
                parsed.model_type
            ))
        })?;

        if parsed.n_features != N_FEATURES {
            return Err(invalid(format!(
                "expected {N_FEATURES} features, got {}",
                parsed.n_features
            )));
        }
        if parsed.feature_names != FEATURE_NAMES {
            return Err(invalid(format!(
                "feature names {:?} do not match {:?}",
                parsed.feature_names, FEATURE_NAMES
            )));
        }
        if parsed.companies.is_empty() {
            return Err(invalid("artifact lists no companies".to_string()));
        }

        let regressor = match kind {
            ModelKind::Linear => {
                let coefficients = parsed
                    .coefficients
                    .ok_or_else(|| invalid("linear model missing coefficients".to_string()))?;
                let intercept = parsed
                    .intercept
                    .ok_or_else(|| invalid("linear model missing intercept".to_string()))?;
                if coefficients.len() != parsed.n_features {
                    return Err(invalid(format!(
                        "{} coefficients, expected {}",
                        coefficients.len(),
                        parsed.n_features
                    )));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(invalid("linear model has non-finite weights".to_string()));
                }
                Regressor::Linear(LinearRegressor::from_parts(coefficients, intercept))
            }
            ModelKind::RandomForest => {
                let trees = parsed
                    .trees
                    .ok_or_else(|| invalid("random forest missing trees".to_string()))?;
                let trees = trees
                    .into_iter()
                    .enumerate()
                    .map(|(t, tree)| {
                        if tree.n_nodes != tree.nodes.len() {
                            return Err(invalid(format!(
                                "tree {t}: n_nodes {} but {} nodes",
                                tree.n_nodes,
                                tree.nodes.len()
                            )));
                        }
                        RegressionTree::from_nodes(tree.nodes, parsed.n_features)
                            .map_err(|e| invalid(format!("tree {t}: {e}")))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Regressor::RandomForest(RandomForestRegressor::from_trees(
                    trees,
                    parsed.n_features,
                )?)
            }
        };

        Ok(TrainedModel {
            regressor,
            encoder: parsed.companies,
            metrics: parsed.metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_json(model_type: &str, n_coef: usize) -> String {
        let coefficients = vec!["0.5"; n_coef].join(",");
        format!(
            r#"{{
                "model_type": "{model_type}",
                "n_features": 9,
                "feature_names": ["company_encoded","open","high","low","close","prev_close","ma_5","ma_10","volatility"],
                "companies": ["TCS", "INFY"],
                "coefficients": [{coefficients}],
                "intercept": 1.0
            }}"#
        )
    }

    #[test]
    fn test_load_linear() {
        let model = TrainedModel::from_json_str(&linear_json("linear", 9)).unwrap();
        assert_eq!(model.regressor().kind(), ModelKind::Linear);
        assert_eq!(model.encoder().classes(), &["INFY", "TCS"]);
        assert!(model.metrics().is_none());
        assert!((model.regressor().predict(&[2.0; 9]) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_model_type() {
        let err = TrainedModel::from_json_str(&linear_json("svm_linear", 9)).unwrap_err();
        assert!(err.to_string().contains("random_forest"));
    }

    #[test]
    fn test_coefficient_count_checked() {
        let err = TrainedModel::from_json_str(&linear_json("linear", 8)).unwrap_err();
        assert!(matches!(err, ModelError::InvalidArtifact(_)));
    }

    #[test]
    fn test_feature_names_checked() {
        let json = linear_json("linear", 9).replace("ma_10", "ma_20");
        assert!(TrainedModel::from_json_str(&json).is_err());
    }

    #[test]
    fn test_forest_tree_validated() {
        let json = r#"{
            "model_type": "random_forest",
            "n_features": 9,
            "feature_names": ["company_encoded","open","high","low","close","prev_close","ma_5","ma_10","volatility"],
            "companies": ["TCS"],
            "trees": [{"n_nodes": 3, "nodes": [
                {"feature": 12, "threshold": 1.0, "left": 1, "right": 2, "value": null},
                {"feature": -1, "threshold": 0.0, "left": -1, "right": -1, "value": 1.0},
                {"feature": -1, "threshold": 0.0, "left": -1, "right": -1, "value": 2.0}
            ]}]
        }"#;
        let err = TrainedModel::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("tree 0"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            TrainedModel::from_json_str("{not json"),
            Err(ModelError::Json(_))
        ));
    }
}
