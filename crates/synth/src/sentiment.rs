//! Daily news sentiment per company.
//!
//! Unlike prices, sentiment carries no state between days. The only
//! per-company quantity is the base bias, fixed before the day loop; each
//! day's score is rebuilt from that bias, the day index and fresh draws.

use catalog::{Catalog, Company};
use rand::Rng;
use tracing::debug;
use types::{SentimentRow, round_dp};

use crate::config::SentimentModel;
use crate::error::Result;
use crate::generator::{TableGenerator, WalkContext};
use crate::random::{StreamKey, uniform};

/// Random inputs of one sentiment day, in draw order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentDraws {
    pub noise: f64,
    /// `Some` when the news spike fired.
    pub spike: Option<f64>,
}

impl SentimentDraws {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, model: &SentimentModel) -> Self {
        let noise = uniform(rng, model.noise);
        let spike = rng
            .random_bool(model.spike_probability)
            .then(|| uniform(rng, model.spike));
        Self { noise, spike }
    }
}

/// Slow market cycle at day index `day`.
#[inline]
pub fn market_cycle(day: usize, model: &SentimentModel) -> f64 {
    model.cycle_amplitude * (day as f64 / model.cycle_period).sin()
}

/// Score for one day, clamped to `[-1, 1]` (unrounded).
pub fn sentiment_score(
    base_bias: f64,
    day: usize,
    model: &SentimentModel,
    draws: &SentimentDraws,
) -> f64 {
    let spike = draws.spike.unwrap_or(0.0);
    let raw = base_bias + market_cycle(day, model) + draws.noise + spike;
    raw.clamp(-1.0, 1.0)
}

/// Generates the sentiment table, ordered by company then date.
#[derive(Debug, Clone, Copy)]
pub struct SentimentGenerator<'a> {
    catalog: &'a Catalog,
    model: &'a SentimentModel,
}

impl<'a> SentimentGenerator<'a> {
    pub fn new(catalog: &'a Catalog, model: &'a SentimentModel) -> Self {
        Self { catalog, model }
    }

    /// Sector bias plus the company's override, or a draw from the catalog's
    /// bias range when there is none. Draws only in the latter case.
    pub fn base_bias<R: Rng + ?Sized>(&self, company: &Company, rng: &mut R) -> f64 {
        let sector_bias = self.catalog.sector_params(company.sector).sentiment_bias;
        let company_bias = match self.catalog.sentiment_override(&company.ticker) {
            Some(bias) => bias,
            None => uniform(rng, self.catalog.sentiment_bias_range()),
        };
        sector_bias + company_bias
    }

    pub fn walk(&self, company: &Company, ctx: &WalkContext<'_>) -> Vec<SentimentRow> {
        let mut rng = ctx.source.stream(&StreamKey::Sentiment(&company.ticker));
        let base_bias = self.base_bias(company, &mut rng);

        ctx.calendar
            .dates()
            .iter()
            .enumerate()
            .map(|(day, &date)| {
                let draws = SentimentDraws::sample(&mut rng, self.model);
                SentimentRow {
                    date,
                    company: company.ticker.clone(),
                    sentiment_score: round_dp(
                        sentiment_score(base_bias, day, self.model, &draws),
                        3,
                    ),
                }
            })
            .collect()
    }
}

impl TableGenerator for SentimentGenerator<'_> {
    type Row = SentimentRow;

    fn table(&self) -> &'static str {
        "daily_sentiment"
    }

    fn generate(&self, ctx: &WalkContext<'_>) -> Result<Vec<SentimentRow>> {
        let per_company = parallel::map_slice(
            self.catalog.companies(),
            |company| self.walk(company, ctx),
            ctx.force_sequential,
        );
        let rows: Vec<SentimentRow> = per_company.into_iter().flatten().collect();

        let saturated = rows
            .iter()
            .filter(|r| r.sentiment_score.abs() >= 1.0)
            .count();
        debug!(rows = rows.len(), saturated, "sentiment generated");
        Ok(rows)
    }
}
