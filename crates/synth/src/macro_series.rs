//! Global inflation and interest-rate walk.
//!
//! A single stream drives both series. Each day both increments are drawn
//! (inflation first), then both values are re-clamped into their bounds. The
//! clamped value is what carries into the next day.

use rand_distr::{Distribution, Normal};
use tracing::debug;
use types::{MacroRow, round_dp};

use crate::config::{BoundedWalk, MacroModel};
use crate::error::Result;
use crate::generator::{TableGenerator, WalkContext};
use crate::random::{StreamKey, centered_normal};

/// Carried macro state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroState {
    pub inflation: f64,
    pub interest_rate: f64,
}

impl MacroState {
    pub fn initial(model: &MacroModel) -> Self {
        Self {
            inflation: model.inflation.start,
            interest_rate: model.interest_rate.start,
        }
    }

    /// Apply one day's increments and re-clamp.
    pub fn step(self, model: &MacroModel, inflation_delta: f64, rate_delta: f64) -> Self {
        Self {
            inflation: clamp_to(&model.inflation, self.inflation + inflation_delta),
            interest_rate: clamp_to(&model.interest_rate, self.interest_rate + rate_delta),
        }
    }
}

#[inline]
fn clamp_to(walk: &BoundedWalk, value: f64) -> f64 {
    value.clamp(walk.bounds.low, walk.bounds.high)
}

/// Generates the macro table: one row per calendar date.
#[derive(Debug, Clone, Copy)]
pub struct MacroGenerator<'a> {
    model: &'a MacroModel,
}

impl<'a> MacroGenerator<'a> {
    pub fn new(model: &'a MacroModel) -> Self {
        Self { model }
    }

    fn increments(&self) -> Result<(Normal<f64>, Normal<f64>)> {
        Ok((
            centered_normal("inflation", self.model.inflation.step_std)?,
            centered_normal("interest_rate", self.model.interest_rate.step_std)?,
        ))
    }
}

impl TableGenerator for MacroGenerator<'_> {
    type Row = MacroRow;

    fn table(&self) -> &'static str {
        "inflation_interest"
    }

    fn generate(&self, ctx: &WalkContext<'_>) -> Result<Vec<MacroRow>> {
        let (inflation_noise, rate_noise) = self.increments()?;
        let mut rng = ctx.source.stream(&StreamKey::Macro);
        let mut state = MacroState::initial(self.model);

        let rows: Vec<MacroRow> = ctx
            .calendar
            .dates()
            .iter()
            .map(|&date| {
                let inflation_delta = inflation_noise.sample(&mut rng);
                let rate_delta = rate_noise.sample(&mut rng);
                state = state.step(self.model, inflation_delta, rate_delta);
                MacroRow {
                    date,
                    inflation: round_dp(state.inflation, 2),
                    interest_rate: round_dp(state.interest_rate, 2),
                }
            })
            .collect();

        debug!(rows = rows.len(), "macro series generated");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_accumulates() {
        let model = MacroModel::default();
        let state = MacroState::initial(&model).step(&model, 0.1, -0.2);
        assert!((state.inflation - 5.6).abs() < 1e-12);
        assert!((state.interest_rate - 6.3).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_is_reapplied_every_step() {
        let model = MacroModel::default();
        let state = MacroState {
            inflation: 8.95,
            interest_rate: 3.6,
        };
        let state = state.step(&model, 1.0, -1.0);
        assert_eq!(state.inflation, 9.0);
        assert_eq!(state.interest_rate, 3.5);

        // continues from the clamped position
        let state = state.step(&model, -0.5, 0.25);
        assert!((state.inflation - 8.5).abs() < 1e-12);
        assert!((state.interest_rate - 3.75).abs() < 1e-12);
    }
}
