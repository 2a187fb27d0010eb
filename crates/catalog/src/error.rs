//! Error types for catalog loading and validation.

use std::path::PathBuf;

use types::{Sector, Ticker};

use crate::params::ParamKind;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Configuration errors. All of them are fatal and surface before generation.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A listed company has no sector mapping.
    #[error("company {0} has no sector mapping")]
    UnmappedCompany(Ticker),

    /// The sector table has no row for a sector.
    #[error("sector {0} has no parameter row")]
    MissingSector(Sector),

    /// A sector row lacks a required parameter.
    #[error("sector {sector} is missing parameter {kind}")]
    MissingParameter { sector: Sector, kind: ParamKind },

    /// A sampling range has low > high or a non-finite bound.
    #[error("invalid range for {what}: [{low}, {high}]")]
    InvalidRange { what: String, low: f64, high: f64 },

    /// A scalar parameter is non-finite or out of its domain.
    #[error("invalid value for {what}: {value}")]
    InvalidValue { what: String, value: f64 },

    /// A company is listed twice.
    #[error("company {0} is listed more than once")]
    DuplicateCompany(Ticker),

    /// A company is referenced by a table but not listed.
    #[error("{context} references unknown company {company}")]
    UnknownCompany {
        context: &'static str,
        company: Ticker,
    },

    /// A company is both a large cap and a mid cap.
    #[error("company {0} is listed in more than one size tier")]
    ConflictingTier(Ticker),

    /// An index is listed twice.
    #[error("index {0} is listed more than once")]
    DuplicateIndex(String),

    /// No companies at all.
    #[error("catalog lists no companies")]
    Empty,

    /// Catalog file could not be read.
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not valid JSON for the expected shape.
    #[error("catalog JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
