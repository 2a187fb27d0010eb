//! Error types for dataset generation.

use catalog::CatalogError;

/// Result type for generator operations.
pub type Result<T> = std::result::Result<T, SynthError>;

/// Errors that abort a generation run.
///
/// Numeric degeneracy (an index drifting negative, a price sitting on the
/// floor) is valid output and never produces one of these.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    /// The run configuration is malformed.
    #[error("invalid generator config: {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// The catalog failed validation or a lookup missed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A distribution could not be built from its parameters.
    #[error("invalid distribution for {what}: {reason}")]
    Distribution { what: String, reason: String },
}

impl SynthError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        SynthError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn distribution(what: impl Into<String>, reason: impl ToString) -> Self {
        SynthError::Distribution {
            what: what.into(),
            reason: reason.to_string(),
        }
    }
}
