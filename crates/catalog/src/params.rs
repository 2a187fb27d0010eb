//! Typed sector parameter table.
//!
//! Each sector owns exactly one [`SectorParams`] row. [`SectorTable`] is
//! indexed by the closed [`Sector`] enumeration, so once built a lookup
//! cannot miss.

use std::fmt;

use serde::{Deserialize, Serialize};
use types::Sector;

use crate::error::{CatalogError, Result};

// =============================================================================
// ValueRange
// =============================================================================

/// Inclusive uniform sampling range `[low, high]`.
///
/// Serialized as a two-element array, e.g. `[10.0, 25.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

impl ValueRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Check the bounds are finite and ordered.
    pub fn validate(&self, what: impl Into<String>) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() || self.low > self.high {
            return Err(CatalogError::InvalidRange {
                what: what.into(),
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

impl From<(f64, f64)> for ValueRange {
    fn from((low, high): (f64, f64)) -> Self {
        Self { low, high }
    }
}

impl From<ValueRange> for (f64, f64) {
    fn from(range: ValueRange) -> Self {
        (range.low, range.high)
    }
}

/// Inclusive integer range for base volume sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u64, u64)", into = "(u64, u64)")]
pub struct VolumeRange {
    pub low: u64,
    pub high: u64,
}

impl VolumeRange {
    pub const fn new(low: u64, high: u64) -> Self {
        Self { low, high }
    }

    /// Base volume must be positive for volume to stay positive.
    pub fn validate(&self, what: impl Into<String>) -> Result<()> {
        if self.low == 0 || self.low > self.high {
            return Err(CatalogError::InvalidRange {
                what: what.into(),
                low: self.low as f64,
                high: self.high as f64,
            });
        }
        Ok(())
    }
}

impl From<(u64, u64)> for VolumeRange {
    fn from((low, high): (u64, u64)) -> Self {
        Self { low, high }
    }
}

impl From<VolumeRange> for (u64, u64) {
    fn from(range: VolumeRange) -> Self {
        (range.low, range.high)
    }
}

// =============================================================================
// ParamKind / ParamValue
// =============================================================================

/// Name of a per-sector parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Volatility,
    AnnualGrowth,
    PeRatio,
    DebtEquity,
    Roe,
    SentimentBias,
    VolumeMultiplier,
}

impl ParamKind {
    pub const ALL: [ParamKind; 7] = [
        ParamKind::Volatility,
        ParamKind::AnnualGrowth,
        ParamKind::PeRatio,
        ParamKind::DebtEquity,
        ParamKind::Roe,
        ParamKind::SentimentBias,
        ParamKind::VolumeMultiplier,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::Volatility => "volatility",
            ParamKind::AnnualGrowth => "annual_growth",
            ParamKind::PeRatio => "pe_range",
            ParamKind::DebtEquity => "de_range",
            ParamKind::Roe => "roe_range",
            ParamKind::SentimentBias => "sentiment_bias",
            ParamKind::VolumeMultiplier => "volume_multiplier",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Either a fixed scalar or a sampling range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Scalar(f64),
    Range(ValueRange),
}

// =============================================================================
// SectorParams
// =============================================================================

/// Validated parameters for one sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorParams {
    /// Daily relative volatility σ of price shocks.
    pub volatility: f64,
    /// Annual growth rate, de-annualized over 252 trading days.
    pub annual_growth: f64,
    pub pe_range: ValueRange,
    pub de_range: ValueRange,
    pub roe_range: ValueRange,
    /// Additive sentiment bias shared by the sector.
    pub sentiment_bias: f64,
    /// Multiplier applied to every company's base volume.
    pub volume_multiplier: f64,
}

impl SectorParams {
    pub fn get(&self, kind: ParamKind) -> ParamValue {
        match kind {
            ParamKind::Volatility => ParamValue::Scalar(self.volatility),
            ParamKind::AnnualGrowth => ParamValue::Scalar(self.annual_growth),
            ParamKind::PeRatio => ParamValue::Range(self.pe_range),
            ParamKind::DebtEquity => ParamValue::Range(self.de_range),
            ParamKind::Roe => ParamValue::Range(self.roe_range),
            ParamKind::SentimentBias => ParamValue::Scalar(self.sentiment_bias),
            ParamKind::VolumeMultiplier => ParamValue::Scalar(self.volume_multiplier),
        }
    }

    fn validate(&self, sector: Sector) -> Result<()> {
        let what = |kind: ParamKind| format!("{sector}.{kind}");

        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(CatalogError::InvalidValue {
                what: what(ParamKind::Volatility),
                value: self.volatility,
            });
        }
        for (kind, value) in [
            (ParamKind::AnnualGrowth, self.annual_growth),
            (ParamKind::SentimentBias, self.sentiment_bias),
        ] {
            if !value.is_finite() {
                return Err(CatalogError::InvalidValue {
                    what: what(kind),
                    value,
                });
            }
        }
        if !self.volume_multiplier.is_finite() || self.volume_multiplier <= 0.0 {
            return Err(CatalogError::InvalidValue {
                what: what(ParamKind::VolumeMultiplier),
                value: self.volume_multiplier,
            });
        }
        self.pe_range.validate(what(ParamKind::PeRatio))?;
        self.de_range.validate(what(ParamKind::DebtEquity))?;
        self.roe_range.validate(what(ParamKind::Roe))?;
        Ok(())
    }
}

/// One sector row as written in a catalog file; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorParamsConfig {
    pub volatility: Option<f64>,
    pub annual_growth: Option<f64>,
    pub pe_range: Option<ValueRange>,
    pub de_range: Option<ValueRange>,
    pub roe_range: Option<ValueRange>,
    pub sentiment_bias: Option<f64>,
    pub volume_multiplier: Option<f64>,
}

impl SectorParamsConfig {
    /// Resolve into a complete row, naming the first missing parameter.
    pub fn resolve(&self, sector: Sector) -> Result<SectorParams> {
        let missing = |kind| CatalogError::MissingParameter { sector, kind };

        let params = SectorParams {
            volatility: self.volatility.ok_or_else(|| missing(ParamKind::Volatility))?,
            annual_growth: self
                .annual_growth
                .ok_or_else(|| missing(ParamKind::AnnualGrowth))?,
            pe_range: self.pe_range.ok_or_else(|| missing(ParamKind::PeRatio))?,
            de_range: self.de_range.ok_or_else(|| missing(ParamKind::DebtEquity))?,
            roe_range: self.roe_range.ok_or_else(|| missing(ParamKind::Roe))?,
            sentiment_bias: self
                .sentiment_bias
                .ok_or_else(|| missing(ParamKind::SentimentBias))?,
            volume_multiplier: self
                .volume_multiplier
                .ok_or_else(|| missing(ParamKind::VolumeMultiplier))?,
        };
        params.validate(sector)?;
        Ok(params)
    }
}

impl From<SectorParams> for SectorParamsConfig {
    fn from(p: SectorParams) -> Self {
        Self {
            volatility: Some(p.volatility),
            annual_growth: Some(p.annual_growth),
            pe_range: Some(p.pe_range),
            de_range: Some(p.de_range),
            roe_range: Some(p.roe_range),
            sentiment_bias: Some(p.sentiment_bias),
            volume_multiplier: Some(p.volume_multiplier),
        }
    }
}

// =============================================================================
// SectorTable
// =============================================================================

/// Exhaustive sector → parameters table.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorTable {
    rows: [SectorParams; Sector::ALL.len()],
}

impl SectorTable {
    /// Build the table from per-sector config rows.
    ///
    /// Fails on the first sector without a row, the first missing parameter,
    /// or the first invalid value.
    pub fn from_rows<F>(mut row_for: F) -> Result<Self>
    where
        F: FnMut(Sector) -> Option<SectorParamsConfig>,
    {
        let mut rows = Vec::with_capacity(Sector::ALL.len());
        for sector in Sector::ALL {
            let row = row_for(sector).ok_or(CatalogError::MissingSector(sector))?;
            rows.push(row.resolve(sector)?);
        }
        let rows: [SectorParams; 6] = rows
            .try_into()
            .map_err(|_| CatalogError::Empty)?;
        Ok(Self { rows })
    }

    #[inline]
    pub fn get(&self, sector: Sector) -> &SectorParams {
        &self.rows[sector.index()]
    }

    /// Look up a single parameter.
    #[inline]
    pub fn param_for(&self, sector: Sector, kind: ParamKind) -> ParamValue {
        self.get(sector).get(kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Sector, &SectorParams)> {
        Sector::ALL.into_iter().zip(self.rows.iter())
    }
}

// =============================================================================
// Tests
// =============================================================================
