//! Feature derivation for the next-day close model.
//!
//! Turns trade bars into model rows:
//!
//! | feature | definition |
//! |---------|------------|
//! | `company_encoded` | position of the company in the sorted class list |
//! | `open`, `high`, `low`, `close` | the bar itself |
//! | `prev_close` | previous close of the same company |
//! | `ma_5`, `ma_10` | trailing means of close, including the current bar |
//! | `volatility` | `high - low` |
//!
//! The training target is the next close of the same company.

pub mod derive;
pub mod encoder;
pub mod rolling;

pub use derive::{
    FEATURE_NAMES, FeatureRow, FeatureTable, FeatureVector, LONG_WINDOW, N_FEATURES, Quote,
    SHORT_WINDOW, derive_features, sort_bars,
};
pub use encoder::CompanyEncoder;
pub use rolling::TrailingWindow;
