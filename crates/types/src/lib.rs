//! Core types for the synthetic market dataset.
//!
//! This crate provides the shared vocabulary used by every other crate:
//! sectors, size tiers, markets, and the row types of each output table.
//! It carries no behavior beyond parsing, display and rounding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod rows;

pub use rows::{
    FundamentalsRow, IndexRow, MacroRow, PriceRow, SentimentRow, TradeBar, VolumeRow,
};

// =============================================================================
// Constants
// =============================================================================

/// Trading days per year used to de-annualize growth rates.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

// =============================================================================
// Identifier Types
// =============================================================================

/// Company ticker (e.g., "HDFCBANK", "M&M").
pub type Ticker = String;

/// Global index name (e.g., "SENSEX", "NASDAQ").
pub type IndexName = String;

// =============================================================================
// Sector
// =============================================================================

/// Industry classification that parameterizes every company-level generator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Sector {
    Finance,
    #[serde(rename = "IT")]
    It,
    Energy,
    Pharma,
    Metal,
    Auto,
}

impl Sector {
    /// Every sector, in table order.
    pub const ALL: [Sector; 6] = [
        Sector::Finance,
        Sector::It,
        Sector::Energy,
        Sector::Pharma,
        Sector::Metal,
        Sector::Auto,
    ];

    /// Dense position of this sector in [`Sector::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Sector::Finance => 0,
            Sector::It => 1,
            Sector::Energy => 2,
            Sector::Pharma => 3,
            Sector::Metal => 4,
            Sector::Auto => 5,
        }
    }

    /// Display name as written in the output tables.
    pub fn as_str(self) -> &'static str {
        match self {
            Sector::Finance => "Finance",
            Sector::It => "IT",
            Sector::Energy => "Energy",
            Sector::Pharma => "Pharma",
            Sector::Metal => "Metal",
            Sector::Auto => "Auto",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sector {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sector::ALL
            .into_iter()
            .find(|sector| sector.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("sector", s))
    }
}

// =============================================================================
// SizeTier
// =============================================================================

/// Coarse company size controlling base trading volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeTier {
    Large,
    Mid,
    Small,
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeTier::Large => write!(f, "Large"),
            SizeTier::Mid => write!(f, "Mid"),
            SizeTier::Small => write!(f, "Small"),
        }
    }
}

// =============================================================================
// Market
// =============================================================================

/// Exchange on which a price series is simulated.
///
/// Each market is an independent simulation, even for the same company.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Market {
    #[serde(rename = "NSE")]
    Nse,
    #[serde(rename = "BSE")]
    Bse,
}

impl Market {
    /// Markets in generation order.
    pub const ALL: [Market; 2] = [Market::Nse, Market::Bse];

    pub fn as_str(self) -> &'static str {
        match self {
            Market::Nse => "NSE",
            Market::Bse => "BSE",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Market::ALL
            .into_iter()
            .find(|market| market.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("market", s))
    }
}

// =============================================================================
// ParseEnumError
// =============================================================================

/// Returned when a string names no known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

// =============================================================================
// Rounding
// =============================================================================

/// Round half away from zero to `decimals` places.
#[inline]
pub fn round_dp(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

// =============================================================================
// Tests
// =============================================================================
