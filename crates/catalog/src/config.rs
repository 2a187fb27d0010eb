//! Declarative catalog configuration.
//!
//! [`CatalogConfig`] mirrors the catalog as it appears in a JSON file: plain
//! lists and maps with optional fields. [`Catalog::load`](crate::Catalog::load)
//! turns it into the validated, typed catalog.
//!
//! The [`Default`] implementation is the built-in NSE universe: 50 companies
//! across six sectors and four global indices.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use types::{IndexName, Sector, Ticker};

use crate::params::{SectorParamsConfig, ValueRange, VolumeRange};

// =============================================================================
// IndexSpec
// =============================================================================

/// Parameters of one global index random walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSpec {
    /// Index name written to the `index` column.
    pub name: IndexName,
    /// Range for the initial value.
    pub start: ValueRange,
    /// Standard deviation of the daily move, in index points.
    pub daily_volatility: f64,
    /// Annual growth rate.
    pub annual_growth: f64,
}

impl IndexSpec {
    pub fn new(
        name: impl Into<IndexName>,
        start: (f64, f64),
        daily_volatility: f64,
        annual_growth: f64,
    ) -> Self {
        Self {
            name: name.into(),
            start: start.into(),
            daily_volatility,
            annual_growth,
        }
    }
}

// =============================================================================
// TierVolumes
// =============================================================================

/// Base volume range for each size tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierVolumes {
    pub large: VolumeRange,
    pub mid: VolumeRange,
    pub small: VolumeRange,
}

impl Default for TierVolumes {
    fn default() -> Self {
        Self {
            large: VolumeRange::new(8_000_000, 15_000_000),
            mid: VolumeRange::new(3_000_000, 7_000_000),
            small: VolumeRange::new(500_000, 2_500_000),
        }
    }
}

// =============================================================================
// CatalogConfig
// =============================================================================

/// Raw catalog tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Companies in generation order.
    pub companies: Vec<Ticker>,

    /// Company → sector mapping. Every listed company must appear here.
    pub company_sectors: BTreeMap<Ticker, Sector>,

    /// Sector → parameter row. Every sector must appear with every field.
    pub sectors: BTreeMap<Sector, SectorParamsConfig>,

    /// Global indices in generation order.
    pub indices: Vec<IndexSpec>,

    /// Fixed company sentiment bias. Companies not listed draw theirs
    /// from `sentiment_bias_range`.
    pub sentiment_overrides: BTreeMap<Ticker, f64>,

    /// Range of the per-company sentiment bias when no override exists.
    pub sentiment_bias_range: ValueRange,

    /// Large cap membership. Every other company not in `mid_caps` is small.
    pub large_caps: Vec<Ticker>,

    /// Mid cap membership.
    pub mid_caps: Vec<Ticker>,

    /// Base volume range per tier.
    pub tier_volumes: TierVolumes,
}

impl CatalogConfig {
    /// Parse a catalog from a JSON string (not yet validated).
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize as pretty JSON, e.g. to seed a custom catalog file.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let sector_rows: [(Sector, &[&str]); 6] = [
            (
                Sector::Finance,
                &[
                    "HDFC", "HDFCBANK", "ICICIBANK", "SBIN", "AXISBANK", "KOTAKBANK",
                    "INDUSINDBK", "BANKBARODA", "PNB", "CANBK",
                ],
            ),
            (
                Sector::Energy,
                &[
                    "RELIANCE", "ONGC", "IOC", "BPCL", "HPCL", "TATAPOWER", "ADANIPOWER",
                    "NTPC", "POWERGRID", "COALINDIA",
                ],
            ),
            (
                Sector::It,
                &[
                    "TCS", "INFY", "WIPRO", "HCLTECH", "TECHM", "LTIM", "PERSISTENT",
                    "MPHASIS", "COFORGE", "OFSS",
                ],
            ),
            (
                Sector::Pharma,
                &[
                    "SUNPHARMA", "DRREDDY", "CIPLA", "DIVISLAB", "BIOCON", "LUPIN",
                    "AUROPHARMA", "TORNTPHARM", "ALKEM", "GLENMARK",
                ],
            ),
            (
                Sector::Metal,
                &["TATASTEEL", "JSWSTEEL", "HINDALCO", "VEDL", "SAIL"],
            ),
            (
                Sector::Auto,
                &["MARUTI", "TATAMOTORS", "M&M", "BAJAJ-AUTO", "HEROMOTOCO"],
            ),
        ];

        let mut companies = Vec::new();
        let mut company_sectors = BTreeMap::new();
        for (sector, tickers) in sector_rows {
            for ticker in tickers {
                companies.push(ticker.to_string());
                company_sectors.insert(ticker.to_string(), sector);
            }
        }

        // (sector, σ, growth, P/E, D/E, ROE, sentiment bias, volume multiplier)
        let params = [
            (Sector::Finance, 0.012, 0.10, (10.0, 25.0), (1.5, 4.0), (10.0, 20.0), 0.15, 1.5),
            (Sector::It, 0.015, 0.14, (20.0, 45.0), (0.1, 0.8), (15.0, 30.0), 0.20, 1.2),
            (Sector::Energy, 0.018, 0.09, (8.0, 20.0), (1.0, 3.5), (8.0, 18.0), 0.10, 1.4),
            (Sector::Pharma, 0.017, 0.11, (18.0, 35.0), (0.2, 1.2), (12.0, 25.0), 0.12, 1.1),
            (Sector::Metal, 0.022, 0.08, (6.0, 15.0), (0.5, 2.5), (8.0, 16.0), 0.05, 1.3),
            (Sector::Auto, 0.016, 0.10, (15.0, 30.0), (0.5, 2.0), (10.0, 22.0), 0.08, 1.0),
        ];
        let sectors = params
            .into_iter()
            .map(|(sector, vol, growth, pe, de, roe, bias, mult)| {
                (
                    sector,
                    SectorParamsConfig {
                        volatility: Some(vol),
                        annual_growth: Some(growth),
                        pe_range: Some(pe.into()),
                        de_range: Some(de.into()),
                        roe_range: Some(roe.into()),
                        sentiment_bias: Some(bias),
                        volume_multiplier: Some(mult),
                    },
                )
            })
            .collect();

        let indices = vec![
            IndexSpec::new("SENSEX", (20_000.0, 26_000.0), 120.0, 0.10),
            IndexSpec::new("NIFTY50", (6_000.0, 9_000.0), 80.0, 0.11),
            IndexSpec::new("NASDAQ", (4_000.0, 6_000.0), 150.0, 0.13),
            IndexSpec::new("DOWJONES", (15_000.0, 20_000.0), 130.0, 0.09),
        ];

        let sentiment_overrides = [
            ("RELIANCE", 0.25),
            ("TCS", 0.22),
            ("HDFCBANK", 0.20),
            ("INFY", 0.18),
            ("ICICIBANK", 0.19),
            ("SBIN", 0.17),
        ]
        .into_iter()
        .map(|(t, b)| (t.to_string(), b))
        .collect();

        let to_owned = |list: &[&str]| list.iter().map(|t| t.to_string()).collect::<Vec<_>>();

        Self {
            companies,
            company_sectors,
            sectors,
            indices,
            sentiment_overrides,
            sentiment_bias_range: ValueRange::new(0.02, 0.10),
            large_caps: to_owned(&["RELIANCE", "HDFCBANK", "ICICIBANK", "TCS", "INFY", "SBIN"]),
            mid_caps: to_owned(&[
                "AXISBANK", "KOTAKBANK", "NTPC", "POWERGRID", "HCLTECH", "WIPRO",
            ]),
            tier_volumes: TierVolumes::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_universe_shape() {
        let config = CatalogConfig::default();
        assert_eq!(config.companies.len(), 50);
        assert_eq!(config.company_sectors.len(), 50);
        assert_eq!(config.sectors.len(), 6);
        assert_eq!(config.indices.len(), 4);
        assert_eq!(config.company_sectors["M&M"], Sector::Auto);
        assert_eq!(config.company_sectors["OFSS"], Sector::It);
    }

    #[test]
    fn test_json_round_trip_preserves_config() {
        let config = CatalogConfig::default();
        let json = config.to_json_pretty().unwrap();
        let back = CatalogConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_missing_field_in_sector_row_parses_as_none() {
        let json = r#"{ "volatility": 0.01, "annual_growth": 0.1 }"#;
        let row: SectorParamsConfig = serde_json::from_str(json).unwrap();
        assert_eq!(row.volatility, Some(0.01));
        assert!(row.pe_range.is_none());
    }
}
