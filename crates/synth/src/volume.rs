//! Daily traded volume per company.
//!
//! The base volume is drawn once per company from its size tier's range;
//! each day multiplies it by the sector multiplier, a seasonal cycle, noise
//! and an occasional spike. Nothing else is carried between days.

use catalog::{Catalog, Company};
use rand::Rng;
use tracing::debug;
use types::VolumeRow;

use crate::config::VolumeModel;
use crate::error::Result;
use crate::generator::{TableGenerator, WalkContext};
use crate::random::{StreamKey, sample_inclusive, uniform};

/// Random inputs of one volume day, in draw order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeDraws {
    pub noise: f64,
    /// `Some` when the volume spike fired.
    pub spike: Option<f64>,
}

impl VolumeDraws {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, model: &VolumeModel) -> Self {
        let noise = uniform(rng, model.noise);
        let spike = rng
            .random_bool(model.spike_probability)
            .then(|| uniform(rng, model.spike));
        Self { noise, spike }
    }
}

#[inline]
pub fn seasonal_factor(day: usize, model: &VolumeModel) -> f64 {
    1.0 + model.seasonal_amplitude * (day as f64 / model.seasonal_period).sin()
}

/// Volume for one day, truncated toward zero.
pub fn daily_volume(
    base: u64,
    multiplier: f64,
    day: usize,
    model: &VolumeModel,
    draws: &VolumeDraws,
) -> u64 {
    let spike = draws.spike.unwrap_or(1.0);
    let volume = base as f64 * multiplier * seasonal_factor(day, model) * draws.noise * spike;
    volume.floor() as u64
}

/// Generates the volume table, ordered by company then date.
#[derive(Debug, Clone, Copy)]
pub struct VolumeGenerator<'a> {
    catalog: &'a Catalog,
    model: &'a VolumeModel,
}

impl<'a> VolumeGenerator<'a> {
    pub fn new(catalog: &'a Catalog, model: &'a VolumeModel) -> Self {
        Self { catalog, model }
    }

    pub fn walk(&self, company: &Company, ctx: &WalkContext<'_>) -> Vec<VolumeRow> {
        let mut rng = ctx.source.stream(&StreamKey::Volume(&company.ticker));
        let range = self.catalog.volume_range(company.tier);
        let base = sample_inclusive(&mut rng, range.low, range.high);
        let multiplier = self
            .catalog
            .sector_params(company.sector)
            .volume_multiplier;

        ctx.calendar
            .dates()
            .iter()
            .enumerate()
            .map(|(day, &date)| {
                let draws = VolumeDraws::sample(&mut rng, self.model);
                VolumeRow {
                    date,
                    company: company.ticker.clone(),
                    volume: daily_volume(base, multiplier, day, self.model, &draws),
                }
            })
            .collect()
    }
}

impl TableGenerator for VolumeGenerator<'_> {
    type Row = VolumeRow;

    fn table(&self) -> &'static str {
        "volumes"
    }

    fn generate(&self, ctx: &WalkContext<'_>) -> Result<Vec<VolumeRow>> {
        let per_company = parallel::map_slice(
            self.catalog.companies(),
            |company| self.walk(company, ctx),
            ctx.force_sequential,
        );
        let rows: Vec<VolumeRow> = per_company.into_iter().flatten().collect();
        debug!(rows = rows.len(), "volume generated");
        Ok(rows)
    }
}
