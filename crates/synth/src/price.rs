//! OHLC price walk.
//!
//! Each (market, company) pair is an independent simulation: its own starting
//! price, its own stream. One day of the walk is [`price_step`], a pure
//! function of the carried price and four draws, so the recurrence can be
//! checked in isolation.
//!
//! # Recurrence
//!
//! ```text
//! drift = price · g / 252
//! open  = price + price · ε₁            ε₁ ~ N(0, σ)
//! close = open  + price · ε₂            ε₂ ~ N(0, σ)
//! high  = max(open, close) · h          h  ~ U(1.001, 1.02)
//! low   = min(open, close) · l          l  ~ U(0.98, 0.999)
//! open  = max(open, floor)
//! close = max(close, floor)
//! high  = max(high, open, close)
//! low   = max(min(low, open, close), floor)
//! next  = close + drift
//! ```

use catalog::{Catalog, Company};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;
use types::{Market, PriceRow, TRADING_DAYS_PER_YEAR, round_dp};

use crate::config::PriceModel;
use crate::error::Result;
use crate::generator::{TableGenerator, WalkContext};
use crate::random::{StreamKey, centered_normal, uniform};

// =============================================================================
// Step
// =============================================================================

/// The four random inputs of one price day, in draw order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceDraws {
    /// ε₁, relative shock from the carried price to the open.
    pub open_shock: f64,
    /// ε₂, relative shock from the open to the close.
    pub close_shock: f64,
    pub high_factor: f64,
    pub low_factor: f64,
}

impl PriceDraws {
    /// Draw one day's inputs. The order of draws is fixed.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, shock: &Normal<f64>, model: &PriceModel) -> Self {
        let open_shock = shock.sample(rng);
        let close_shock = shock.sample(rng);
        let high_factor = uniform(rng, model.high_factor);
        let low_factor = uniform(rng, model.low_factor);
        Self {
            open_shock,
            close_shock,
            high_factor,
            low_factor,
        }
    }
}

/// Unrounded OHLC of one simulated day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Advance the walk by one day.
///
/// Returns the carried price for the next day and the clamped bar for today.
/// The drift is computed from the pre-step `price` and added to the clamped
/// close.
pub fn price_step(price: f64, daily_growth: f64, floor: f64, draws: &PriceDraws) -> (f64, Ohlc) {
    let drift = price * daily_growth;

    let open = price + price * draws.open_shock;
    let close = open + price * draws.close_shock;
    let high = open.max(close) * draws.high_factor;
    let low = open.min(close) * draws.low_factor;

    // Order matters: high and low are bounded by the already-floored open/close.
    let open = open.max(floor);
    let close = close.max(floor);
    let high = high.max(open).max(close);
    let low = low.min(open).min(close).max(floor);

    (
        close + drift,
        Ohlc {
            open,
            high,
            low,
            close,
        },
    )
}

// =============================================================================
// PriceGenerator
// =============================================================================

/// Generates the price table for a set of markets.
///
/// Rows are ordered by market, then company (catalog order), then date.
#[derive(Debug, Clone)]
pub struct PriceGenerator<'a> {
    catalog: &'a Catalog,
    model: &'a PriceModel,
    markets: Vec<Market>,
}

impl<'a> PriceGenerator<'a> {
    /// Generator over both NSE and BSE.
    pub fn new(catalog: &'a Catalog, model: &'a PriceModel) -> Self {
        Self::for_markets(catalog, model, &Market::ALL)
    }

    pub fn for_markets(catalog: &'a Catalog, model: &'a PriceModel, markets: &[Market]) -> Self {
        Self {
            catalog,
            model,
            markets: markets.to_vec(),
        }
    }

    /// Walk a single (market, company) pair over the calendar.
    pub fn walk(
        &self,
        market: Market,
        company: &Company,
        ctx: &WalkContext<'_>,
    ) -> Result<Vec<PriceRow>> {
        let params = self.catalog.sector_params(company.sector);
        let shock = centered_normal(
            format!("price shock for {}", company.sector),
            params.volatility,
        )?;
        let daily_growth = params.annual_growth / TRADING_DAYS_PER_YEAR;

        let mut rng = ctx.source.stream(&StreamKey::Price {
            market,
            company: &company.ticker,
        });
        let mut price = uniform(&mut rng, self.model.initial_price);

        let mut rows = Vec::with_capacity(ctx.calendar.len());
        for &date in ctx.calendar.dates() {
            let draws = PriceDraws::sample(&mut rng, &shock, self.model);
            let (next, bar) = price_step(price, daily_growth, self.model.floor, &draws);
            rows.push(PriceRow {
                date,
                market,
                company: company.ticker.clone(),
                open: round_dp(bar.open, 2),
                high: round_dp(bar.high, 2),
                low: round_dp(bar.low, 2),
                close: round_dp(bar.close, 2),
            });
            price = next;
        }
        Ok(rows)
    }
}

impl TableGenerator for PriceGenerator<'_> {
    type Row = PriceRow;

    fn table(&self) -> &'static str {
        "prices"
    }

    fn generate(&self, ctx: &WalkContext<'_>) -> Result<Vec<PriceRow>> {
        let pairs: Vec<(Market, &Company)> = self
            .markets
            .iter()
            .flat_map(|&m| self.catalog.companies().iter().map(move |c| (m, c)))
            .collect();

        let rows = parallel::try_flat_map(
            &pairs,
            |(market, company)| self.walk(*market, company, ctx),
            ctx.force_sequential,
        )?;

        debug!(
            markets = self.markets.len(),
            companies = self.catalog.companies().len(),
            rows = rows.len(),
            "price walk complete"
        );
        Ok(rows)
    }
}

// =============================================================================
// Tests
// =============================================================================
