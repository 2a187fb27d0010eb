//! Entity catalog for the synthetic market dataset.
//!
//! This crate provides:
//! - **Companies**: tickers with sector and size tier
//! - **Sector parameters**: volatility, growth, valuation ranges, sentiment
//!   bias and volume multiplier, as a table keyed by [`types::Sector`]
//! - **Indices**: global index random walk parameters
//!
//! # Loading
//!
//! ```ignore
//! use catalog::{Catalog, CatalogConfig};
//!
//! // Built-in universe
//! let catalog = Catalog::nse_default()?;
//!
//! // Or a JSON file with the same shape as `CatalogConfig`
//! let catalog = Catalog::from_json_file("catalog.json")?;
//! ```
//!
//! Validation is eager: a catalog either loads completely or fails with a
//! [`CatalogError`] before any generator runs.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod config;
pub mod error;
pub mod params;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::{Catalog, Company};
pub use config::{CatalogConfig, IndexSpec, TierVolumes};
pub use error::{CatalogError, Result};
pub use params::{
    ParamKind, ParamValue, SectorParams, SectorParamsConfig, SectorTable, ValueRange,
    VolumeRange,
};
