//! Global index random walk.
//!
//! Additive walk with drift: the noise is in absolute index points, the drift
//! is proportional to the carried value. There is no floor; an index may go
//! negative under pathological parameters.

use catalog::{Catalog, IndexSpec};
use rand_distr::Distribution;
use tracing::debug;
use types::{IndexRow, TRADING_DAYS_PER_YEAR, round_dp};

use crate::error::Result;
use crate::generator::{TableGenerator, WalkContext};
use crate::random::{StreamKey, centered_normal, uniform};

/// One index day: `value + noise + value · daily_growth`.
#[inline]
pub fn index_step(value: f64, daily_growth: f64, noise: f64) -> f64 {
    let growth = value * daily_growth;
    value + noise + growth
}

/// Generates the global index table, ordered by index then date.
#[derive(Debug, Clone, Copy)]
pub struct IndexGenerator<'a> {
    catalog: &'a Catalog,
}

impl<'a> IndexGenerator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Walk one index over the calendar. Rows carry the post-step value.
    pub fn walk(&self, spec: &IndexSpec, ctx: &WalkContext<'_>) -> Result<Vec<IndexRow>> {
        let noise = centered_normal(format!("index {}", spec.name), spec.daily_volatility)?;
        let daily_growth = spec.annual_growth / TRADING_DAYS_PER_YEAR;

        let mut rng = ctx.source.stream(&StreamKey::Index(&spec.name));
        let mut value = uniform(&mut rng, spec.start);

        let rows = ctx
            .calendar
            .dates()
            .iter()
            .map(|&date| {
                value = index_step(value, daily_growth, noise.sample(&mut rng));
                IndexRow {
                    date,
                    index: spec.name.clone(),
                    value: round_dp(value, 2),
                }
            })
            .collect();
        Ok(rows)
    }
}

impl TableGenerator for IndexGenerator<'_> {
    type Row = IndexRow;

    fn table(&self) -> &'static str {
        "global_indices"
    }

    fn generate(&self, ctx: &WalkContext<'_>) -> Result<Vec<IndexRow>> {
        let rows = parallel::try_flat_map(
            self.catalog.indices(),
            |spec| self.walk(spec, ctx),
            ctx.force_sequential,
        )?;
        debug!(
            indices = self.catalog.indices().len(),
            rows = rows.len(),
            "index walk complete"
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_step() {
        assert!((index_step(1000.0, 0.001, 5.0) - 1006.0).abs() < 1e-9);
        assert!((index_step(1000.0, 0.0, -20.0) - 980.0).abs() < 1e-9);
    }

    #[test]
    fn test_index_may_go_negative() {
        assert!(index_step(10.0, 0.0, -50.0) < 0.0);
    }
}
