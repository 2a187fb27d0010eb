//! Full dataset generation.
//!
//! [`DatasetGenerator`] validates the run configuration, builds the calendar
//! and random source once, then invokes each table generator over the shared
//! calendar. The whole dataset is held in memory; nothing is written until
//! every table has been generated.

use std::time::Instant;

use catalog::Catalog;
use tracing::{info, warn};
use types::{
    FundamentalsRow, IndexRow, MacroRow, Market, PriceRow, SentimentRow, VolumeRow,
};

use crate::calendar::Calendar;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::fundamentals::FundamentalsGenerator;
use crate::generator::{TableGenerator, WalkContext};
use crate::index::IndexGenerator;
use crate::macro_series::MacroGenerator;
use crate::price::PriceGenerator;
use crate::random::RandomSource;
use crate::sentiment::SentimentGenerator;
use crate::volume::VolumeGenerator;

// =============================================================================
// Dataset
// =============================================================================

/// Every generated table of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub calendar: Calendar,
    pub seed: u64,
    /// Both markets; ordered by market, company, date.
    pub prices: Vec<PriceRow>,
    pub indices: Vec<IndexRow>,
    pub fundamentals: Vec<FundamentalsRow>,
    pub sentiment: Vec<SentimentRow>,
    pub volumes: Vec<VolumeRow>,
    pub macro_rows: Vec<MacroRow>,
}

impl Dataset {
    /// Price rows of one market, in walk order.
    pub fn prices_for(&self, market: Market) -> impl Iterator<Item = &PriceRow> + '_ {
        self.prices.iter().filter(move |row| row.market == market)
    }

    /// Row counts per table, in output order.
    pub fn row_counts(&self) -> [(&'static str, usize); 6] {
        [
            ("prices", self.prices.len()),
            ("global_indices", self.indices.len()),
            ("company_fundamentals", self.fundamentals.len()),
            ("daily_sentiment", self.sentiment.len()),
            ("volumes", self.volumes.len()),
            ("inflation_interest", self.macro_rows.len()),
        ]
    }
}

// =============================================================================
// DatasetGenerator
// =============================================================================

/// Orchestrates the six table generators over one catalog and config.
#[derive(Debug)]
pub struct DatasetGenerator<'a> {
    catalog: &'a Catalog,
    config: &'a GeneratorConfig,
}

impl<'a> DatasetGenerator<'a> {
    /// # Errors
    /// Fails with a configuration error before any generation if the config
    /// is invalid.
    pub fn new(catalog: &'a Catalog, config: &'a GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    pub fn calendar(&self) -> Calendar {
        Calendar::new(self.config.start, self.config.end, self.config.frequency)
    }

    /// Generate every table.
    pub fn generate(&self) -> Result<Dataset> {
        let calendar = self.calendar();
        if calendar.is_empty() {
            warn!(
                start = %self.config.start,
                end = %self.config.end,
                frequency = %self.config.frequency,
                "calendar has no dates; time-series tables will be empty"
            );
        }

        let ctx = WalkContext::new(&calendar, RandomSource::new(self.config.seed))
            .with_parallel(self.config.parallel);

        info!(
            seed = self.config.seed,
            dates = calendar.len(),
            companies = self.catalog.companies().len(),
            parallel = self.config.parallel,
            "generating dataset"
        );

        let prices = run(&PriceGenerator::new(self.catalog, &self.config.price), &ctx)?;
        let indices = run(&IndexGenerator::new(self.catalog), &ctx)?;
        let fundamentals = run(&FundamentalsGenerator::new(self.catalog), &ctx)?;
        let sentiment = run(
            &SentimentGenerator::new(self.catalog, &self.config.sentiment),
            &ctx,
        )?;
        let volumes = run(
            &VolumeGenerator::new(self.catalog, &self.config.volume),
            &ctx,
        )?;
        let macro_rows = run(&MacroGenerator::new(&self.config.macro_model), &ctx)?;

        Ok(Dataset {
            seed: self.config.seed,
            prices,
            indices,
            fundamentals,
            sentiment,
            volumes,
            macro_rows,
            calendar,
        })
    }
}

fn run<G: TableGenerator>(generator: &G, ctx: &WalkContext<'_>) -> Result<Vec<G::Row>> {
    let started = Instant::now();
    let rows = generator.generate(ctx)?;
    info!(
        table = generator.table(),
        rows = rows.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "table generated"
    );
    Ok(rows)
}
