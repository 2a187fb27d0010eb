//! One-shot valuation ratios per company.

use catalog::{Catalog, Company};
use tracing::debug;
use types::{FundamentalsRow, round_dp};

use crate::error::Result;
use crate::generator::{TableGenerator, WalkContext};
use crate::random::{StreamKey, uniform};

/// Samples P/E, D/E and ROE from each company's sector ranges.
///
/// The table has no date dimension, so it is independent of the calendar.
#[derive(Debug, Clone, Copy)]
pub struct FundamentalsGenerator<'a> {
    catalog: &'a Catalog,
}

impl<'a> FundamentalsGenerator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn sample(&self, company: &Company, ctx: &WalkContext<'_>) -> FundamentalsRow {
        let params = self.catalog.sector_params(company.sector);
        let mut rng = ctx.source.stream(&StreamKey::Fundamentals(&company.ticker));

        let pe_ratio = round_dp(uniform(&mut rng, params.pe_range), 2);
        let debt_equity = round_dp(uniform(&mut rng, params.de_range), 2);
        let roe = round_dp(uniform(&mut rng, params.roe_range), 2);

        FundamentalsRow {
            company: company.ticker.clone(),
            sector: company.sector,
            pe_ratio,
            debt_equity,
            roe,
        }
    }
}

impl TableGenerator for FundamentalsGenerator<'_> {
    type Row = FundamentalsRow;

    fn table(&self) -> &'static str {
        "company_fundamentals"
    }

    fn generate(&self, ctx: &WalkContext<'_>) -> Result<Vec<FundamentalsRow>> {
        let rows = parallel::map_slice(
            self.catalog.companies(),
            |company| self.sample(company, ctx),
            ctx.force_sequential,
        );
        debug!(rows = rows.len(), "fundamentals sampled");
        Ok(rows)
    }
}
