//! The validated entity catalog.
//!
//! A [`Catalog`] is built once per run from a [`CatalogConfig`] and is
//! read-only afterwards. Every lookup a generator performs is checked
//! here, before the first day is simulated.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use tracing::debug;
use types::{Sector, SizeTier, Ticker};

use crate::config::{CatalogConfig, IndexSpec, TierVolumes};
use crate::error::{CatalogError, Result};
use crate::params::{ParamKind, ParamValue, SectorParams, SectorTable, ValueRange, VolumeRange};

// =============================================================================
// Company
// =============================================================================

/// A simulated company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub ticker: Ticker,
    pub sector: Sector,
    pub tier: SizeTier,
}

// =============================================================================
// Catalog
// =============================================================================

/// Validated registry of companies, sector parameters and indices.
#[derive(Debug, Clone)]
pub struct Catalog {
    companies: Vec<Company>,
    sectors: SectorTable,
    indices: Vec<IndexSpec>,
    sentiment_overrides: HashMap<Ticker, f64>,
    sentiment_bias_range: ValueRange,
    tier_volumes: TierVolumes,
}

impl Catalog {
    /// Validate a config into a catalog.
    ///
    /// # Errors
    /// Any missing mapping, missing parameter or malformed value is a
    /// [`CatalogError`]; no partial catalog is ever returned.
    pub fn load(config: CatalogConfig) -> Result<Self> {
        if config.companies.is_empty() {
            return Err(CatalogError::Empty);
        }

        let sectors = SectorTable::from_rows(|sector| config.sectors.get(&sector).cloned())?;

        let listed = unique_companies(&config.companies)?;
        check_known(&listed, config.company_sectors.keys(), "company_sectors")?;
        check_known(&listed, config.sentiment_overrides.keys(), "sentiment_overrides")?;
        check_known(&listed, config.large_caps.iter(), "large_caps")?;
        check_known(&listed, config.mid_caps.iter(), "mid_caps")?;

        let large: HashSet<&str> = config.large_caps.iter().map(String::as_str).collect();
        let mid: HashSet<&str> = config.mid_caps.iter().map(String::as_str).collect();

        let mut companies = Vec::with_capacity(config.companies.len());
        for ticker in &config.companies {
            let sector = *config
                .company_sectors
                .get(ticker)
                .ok_or_else(|| CatalogError::UnmappedCompany(ticker.clone()))?;
            let tier = match (large.contains(ticker.as_str()), mid.contains(ticker.as_str())) {
                (true, true) => return Err(CatalogError::ConflictingTier(ticker.clone())),
                (true, false) => SizeTier::Large,
                (false, true) => SizeTier::Mid,
                (false, false) => SizeTier::Small,
            };
            companies.push(Company {
                ticker: ticker.clone(),
                sector,
                tier,
            });
        }

        validate_indices(&config.indices)?;
        validate_overrides(&config.sentiment_overrides)?;
        config
            .sentiment_bias_range
            .validate("sentiment_bias_range")?;
        config.tier_volumes.large.validate("tier_volumes.large")?;
        config.tier_volumes.mid.validate("tier_volumes.mid")?;
        config.tier_volumes.small.validate("tier_volumes.small")?;

        debug!(
            companies = companies.len(),
            indices = config.indices.len(),
            "catalog validated"
        );

        Ok(Self {
            companies,
            sectors,
            indices: config.indices,
            sentiment_overrides: config.sentiment_overrides.into_iter().collect(),
            sentiment_bias_range: config.sentiment_bias_range,
            tier_volumes: config.tier_volumes,
        })
    }

    /// Load and validate a catalog JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(CatalogConfig::from_json_str(&content)?)
    }

    /// The built-in NSE universe.
    pub fn nse_default() -> Result<Self> {
        Self::load(CatalogConfig::default())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────

    /// Companies in generation order.
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn company(&self, ticker: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.ticker == ticker)
    }

    /// Sector of a listed company.
    pub fn sector_of(&self, ticker: &str) -> Result<Sector> {
        self.company(ticker)
            .map(|c| c.sector)
            .ok_or_else(|| CatalogError::UnmappedCompany(ticker.to_string()))
    }

    pub fn sector_params(&self, sector: Sector) -> &SectorParams {
        self.sectors.get(sector)
    }

    pub fn param_for(&self, sector: Sector, kind: ParamKind) -> ParamValue {
        self.sectors.param_for(sector, kind)
    }

    pub fn sectors(&self) -> &SectorTable {
        &self.sectors
    }

    pub fn indices(&self) -> &[IndexSpec] {
        &self.indices
    }

    /// Fixed sentiment bias for a company, if one is configured.
    pub fn sentiment_override(&self, ticker: &str) -> Option<f64> {
        self.sentiment_overrides.get(ticker).copied()
    }

    pub fn sentiment_bias_range(&self) -> ValueRange {
        self.sentiment_bias_range
    }

    /// Base volume range for a size tier.
    pub fn volume_range(&self, tier: SizeTier) -> VolumeRange {
        match tier {
            SizeTier::Large => self.tier_volumes.large,
            SizeTier::Mid => self.tier_volumes.mid,
            SizeTier::Small => self.tier_volumes.small,
        }
    }
}

// =============================================================================
// Validation helpers
// =============================================================================

fn unique_companies(companies: &[Ticker]) -> Result<HashSet<&str>> {
    let mut seen = HashSet::with_capacity(companies.len());
    for ticker in companies {
        if !seen.insert(ticker.as_str()) {
            return Err(CatalogError::DuplicateCompany(ticker.clone()));
        }
    }
    Ok(seen)
}

fn check_known<'a>(
    listed: &HashSet<&str>,
    referenced: impl IntoIterator<Item = &'a Ticker>,
    context: &'static str,
) -> Result<()> {
    for ticker in referenced {
        if !listed.contains(ticker.as_str()) {
            return Err(CatalogError::UnknownCompany {
                context,
                company: ticker.clone(),
            });
        }
    }
    Ok(())
}

fn validate_indices(indices: &[IndexSpec]) -> Result<()> {
    let mut seen = HashSet::new();
    for spec in indices {
        if !seen.insert(spec.name.as_str()) {
            return Err(CatalogError::DuplicateIndex(spec.name.clone()));
        }
        spec.start.validate(format!("{}.start", spec.name))?;
        if !spec.daily_volatility.is_finite() || spec.daily_volatility < 0.0 {
            return Err(CatalogError::InvalidValue {
                what: format!("{}.daily_volatility", spec.name),
                value: spec.daily_volatility,
            });
        }
        if !spec.annual_growth.is_finite() {
            return Err(CatalogError::InvalidValue {
                what: format!("{}.annual_growth", spec.name),
                value: spec.annual_growth,
            });
        }
    }
    Ok(())
}

fn validate_overrides(overrides: &BTreeMap<Ticker, f64>) -> Result<()> {
    match overrides.iter().find(|(_, bias)| !bias.is_finite()) {
        Some((ticker, bias)) => Err(CatalogError::InvalidValue {
            what: format!("sentiment_overrides.{ticker}"),
            value: *bias,
        }),
        None => Ok(()),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_loads() {
        let catalog = Catalog::nse_default().unwrap();
        assert_eq!(catalog.companies().len(), 50);
        assert_eq!(catalog.sector_of("TCS").unwrap(), Sector::It);
        let metal = catalog
            .companies()
            .iter()
            .filter(|c| c.sector == Sector::Metal)
            .count();
        assert_eq!(metal, 5);
    }

    #[test]
    fn test_size_tiers_from_membership() {
        let catalog = Catalog::nse_default().unwrap();
        assert_eq!(catalog.company("RELIANCE").unwrap().tier, SizeTier::Large);
        assert_eq!(catalog.company("WIPRO").unwrap().tier, SizeTier::Mid);
        assert_eq!(catalog.company("SAIL").unwrap().tier, SizeTier::Small);

        let small = catalog
            .companies()
            .iter()
            .filter(|c| c.tier == SizeTier::Small)
            .count();
        assert_eq!(small, 38);
    }

    #[test]
    fn test_missing_company_sector_is_fatal() {
        let mut config = CatalogConfig::default();
        config.company_sectors.remove("LUPIN");
        let err = Catalog::load(config).unwrap_err();
        assert!(matches!(err, CatalogError::UnmappedCompany(t) if t == "LUPIN"));
    }

    #[test]
    fn test_missing_sector_row_is_fatal() {
        let mut config = CatalogConfig::default();
        config.sectors.remove(&Sector::Energy);
        let err = Catalog::load(config).unwrap_err();
        assert!(matches!(err, CatalogError::MissingSector(Sector::Energy)));
    }

    #[test]
    fn test_missing_sector_parameter_is_fatal() {
        let mut config = CatalogConfig::default();
        if let Some(row) = config.sectors.get_mut(&Sector::It) {
            row.volume_multiplier = None;
        }
        let err = Catalog::load(config).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingParameter {
                sector: Sector::It,
                kind: ParamKind::VolumeMultiplier
            }
        ));
    }

    #[test]
    fn test_duplicate_company_rejected() {
        let mut config = CatalogConfig::default();
        config.companies.push("TCS".to_string());
        assert!(matches!(
            Catalog::load(config),
            Err(CatalogError::DuplicateCompany(t)) if t == "TCS"
        ));
    }

    #[test]
    fn test_conflicting_tier_rejected() {
        let mut config = CatalogConfig::default();
        config.mid_caps.push("TCS".to_string());
        assert!(matches!(
            Catalog::load(config),
            Err(CatalogError::ConflictingTier(t)) if t == "TCS"
        ));
    }

    #[test]
    fn test_unknown_override_rejected() {
        let mut config = CatalogConfig::default();
        config.sentiment_overrides.insert("ACME".to_string(), 0.3);
        assert!(matches!(
            Catalog::load(config),
            Err(CatalogError::UnknownCompany {
                context: "sentiment_overrides",
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_company_lookup_fails() {
        let catalog = Catalog::nse_default().unwrap();
        assert!(catalog.sector_of("ACME").is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, CatalogConfig::default().to_json_pretty().unwrap()).unwrap();

        let catalog = Catalog::from_json_file(&path).unwrap();
        assert_eq!(catalog.indices().len(), 4);
        assert_eq!(catalog.sentiment_override("TCS"), Some(0.22));
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = Catalog::from_json_file("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
