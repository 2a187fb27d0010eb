//! Error types for training, artifacts and serving.

use std::path::PathBuf;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors from fitting, saving or loading a model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid training config: {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Too few complete feature rows to fit anything.
    #[error("not enough training rows: {rows}")]
    EmptyTrainingSet { rows: usize },

    #[error("inconsistent training data: {0}")]
    Shape(String),

    /// The normal equations have no unique solution.
    #[error("singular system while fitting the linear model")]
    Singular,

    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] storage::StorageError),
}

impl ModelError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        ModelError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ModelError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Per-request serving failures. The predictor keeps serving other companies.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    /// The company was not seen when the model was trained.
    #[error("company {0} not found in trained model")]
    UnknownCompany(String),

    /// The company is known but has no row with full lag and trailing history.
    #[error("no complete feature row for {0}")]
    NoFeatureRow(String),

    #[error("model expects {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PredictError::UnknownCompany("ACME".into());
        assert_eq!(err.to_string(), "company ACME not found in trained model");

        let err = PredictError::DimensionMismatch { expected: 9, got: 8 };
        assert_eq!(err.to_string(), "model expects 9 features, got 8");

        let err = ModelError::config("test_fraction", "must be in [0, 1)");
        assert_eq!(
            err.to_string(),
            "invalid training config: test_fraction: must be in [0, 1)"
        );
    }
}
