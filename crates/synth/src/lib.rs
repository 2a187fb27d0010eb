//! Synthetic market dataset generator.
//!
//! Six independent generators run over one shared trading calendar:
//!
//! | generator | table | carried state |
//! |-----------|-------|---------------|
//! | [`PriceGenerator`] | `date, market, company, open, high, low, close` | price per (market, company) |
//! | [`IndexGenerator`] | `date, index, value` | value per index |
//! | [`FundamentalsGenerator`] | `company, sector, pe_ratio, debt_equity, roe` | none |
//! | [`SentimentGenerator`] | `date, company, sentiment_score` | base bias only |
//! | [`VolumeGenerator`] | `date, company, volume` | base volume only |
//! | [`MacroGenerator`] | `date, inflation, interest_rate` | inflation, rate |
//!
//! # Determinism
//!
//! Randomness is injected through [`RandomSource`], which derives one
//! ChaCha8 stream per entity from the master seed. Output for a seed is
//! identical whether the entities are walked sequentially or on the rayon
//! pool.
//!
//! # Example
//!
//! ```ignore
//! use catalog::Catalog;
//! use synth::{DatasetGenerator, GeneratorConfig};
//!
//! let catalog = Catalog::nse_default()?;
//! let config = GeneratorConfig::default().with_seed(7);
//! let dataset = DatasetGenerator::new(&catalog, &config)?.generate()?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calendar;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fundamentals;
pub mod generator;
pub mod index;
pub mod macro_series;
pub mod price;
pub mod random;
pub mod sentiment;
pub mod volume;

// =============================================================================
// Re-exports
// =============================================================================

pub use calendar::{Calendar, is_business_day};
pub use config::{
    BoundedWalk, Frequency, GeneratorConfig, MacroModel, PriceModel, SentimentModel, VolumeModel,
};
pub use dataset::{Dataset, DatasetGenerator};
pub use error::{Result, SynthError};
pub use fundamentals::FundamentalsGenerator;
pub use generator::{TableGenerator, WalkContext};
pub use index::{IndexGenerator, index_step};
pub use macro_series::{MacroGenerator, MacroState};
pub use price::{Ohlc, PriceDraws, PriceGenerator, price_step};
pub use random::{RandomSource, StreamKey, StreamRng};
pub use sentiment::{SentimentDraws, SentimentGenerator};
pub use volume::{VolumeDraws, VolumeGenerator};
