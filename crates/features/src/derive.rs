//! Per-company feature derivation from trade bars.
//!
//! Bars are ordered by `(company, trade_date)` and walked one company at a
//! time. Lag and trailing-mean features are `None` until enough history
//! exists; the `target` is the next bar's close and is `None` on the last bar
//! of each company.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use types::TradeBar;

use crate::encoder::CompanyEncoder;
use crate::rolling::TrailingWindow;

// =============================================================================
// Feature layout
// =============================================================================

pub const N_FEATURES: usize = 9;

/// Model input in [`FEATURE_NAMES`] order.
pub type FeatureVector = [f64; N_FEATURES];

pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "company_encoded",
    "open",
    "high",
    "low",
    "close",
    "prev_close",
    "ma_5",
    "ma_10",
    "volatility",
];

/// Short trailing mean length.
pub const SHORT_WINDOW: usize = 5;
/// Long trailing mean length.
pub const LONG_WINDOW: usize = 10;

/// One derived row per input bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub company: String,
    pub trade_date: NaiveDate,
    pub company_encoded: usize,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub prev_close: Option<f64>,
    pub ma_5: Option<f64>,
    pub ma_10: Option<f64>,
    pub volatility: f64,
    /// Next close for the same company.
    pub target: Option<f64>,
}

impl FeatureRow {
    /// Whether every lag and trailing feature is present.
    pub fn has_history(&self) -> bool {
        self.prev_close.is_some() && self.ma_5.is_some() && self.ma_10.is_some()
    }

    /// Feature vector, or `None` while history is insufficient.
    pub fn features(&self) -> Option<FeatureVector> {
        Some([
            self.company_encoded as f64,
            self.open,
            self.high,
            self.low,
            self.close,
            self.prev_close?,
            self.ma_5?,
            self.ma_10?,
            self.volatility,
        ])
    }

    /// Features and target, or `None` if any value is missing.
    pub fn training_sample(&self) -> Option<(FeatureVector, f64)> {
        Some((self.features()?, self.target?))
    }

    /// Feature vector for a caller-supplied bar, reusing this row's encoded
    /// company, lag and trailing features. Volatility comes from the new bar.
    pub fn with_quote(&self, quote: &Quote) -> Option<FeatureVector> {
        Some([
            self.company_encoded as f64,
            quote.open,
            quote.high,
            quote.low,
            quote.close,
            self.prev_close?,
            self.ma_5?,
            self.ma_10?,
            quote.high - quote.low,
        ])
    }
}

/// OHLC values supplied at prediction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl From<&FeatureRow> for Quote {
    fn from(row: &FeatureRow) -> Self {
        Self {
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
        }
    }
}

// =============================================================================
// Feature table
// =============================================================================

/// Derived rows ordered by `(company, trade_date)`.
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
    /// Bars dropped because their company is not in the encoder.
    pub unknown_bars: usize,
}

impl FeatureTable {
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows of one company in date order.
    pub fn rows_for(&self, company: &str) -> &[FeatureRow] {
        let start = self.rows.partition_point(|r| r.company.as_str() < company);
        let end = self.rows.partition_point(|r| r.company.as_str() <= company);
        &self.rows[start..end]
    }

    /// Distinct companies, sorted.
    pub fn companies(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for row in &self.rows {
            if out.last() != Some(&row.company.as_str()) {
                out.push(&row.company);
            }
        }
        out
    }

    /// Latest row of a company whose lag and trailing features are present.
    pub fn latest_complete(&self, company: &str) -> Option<&FeatureRow> {
        self.rows_for(company).iter().rev().find(|r| r.has_history())
    }

    /// Latest row of a company regardless of history.
    pub fn latest(&self, company: &str) -> Option<&FeatureRow> {
        self.rows_for(company).last()
    }

    /// Complete rows as `(inputs, targets)` in table order.
    pub fn training_set(&self) -> (Vec<FeatureVector>, Vec<f64>) {
        self.rows.iter().filter_map(FeatureRow::training_sample).unzip()
    }
}

// =============================================================================
// Derivation
// =============================================================================

/// Sort bars by `(company, trade_date)`; ties keep input order.
pub fn sort_bars(bars: &mut [TradeBar]) {
    bars.sort_by(|a, b| {
        a.company
            .cmp(&b.company)
            .then_with(|| a.trade_date.cmp(&b.trade_date))
    });
}

/// Derive features for every bar whose company the encoder knows.
///
/// Unknown companies are skipped and counted in
/// [`FeatureTable::unknown_bars`].
pub fn derive_features(bars: &[TradeBar], encoder: &CompanyEncoder) -> FeatureTable {
    let mut sorted = bars.to_vec();
    sort_bars(&mut sorted);

    let mut table = FeatureTable {
        rows: Vec::with_capacity(sorted.len()),
        unknown_bars: 0,
    };

    for group in sorted.chunk_by(|a, b| a.company == b.company) {
        let Some(code) = encoder.encode(&group[0].company) else {
            table.unknown_bars += group.len();
            continue;
        };
        derive_company(group, code, &mut table.rows);
    }

    if table.unknown_bars > 0 {
        warn!(
            bars = table.unknown_bars,
            "skipped bars for companies unknown to the encoder"
        );
    }
    debug!(rows = table.rows.len(), "features derived");
    table
}

/// Walk one company's bars in date order.
fn derive_company(bars: &[TradeBar], code: usize, out: &mut Vec<FeatureRow>) {
    let mut short = TrailingWindow::new(SHORT_WINDOW);
    let mut long = TrailingWindow::new(LONG_WINDOW);
    let mut prev_close = None;

    for (i, bar) in bars.iter().enumerate() {
        short.push(bar.close);
        long.push(bar.close);
        out.push(FeatureRow {
            company: bar.company.clone(),
            trade_date: bar.trade_date,
            company_encoded: code,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            prev_close,
            ma_5: short.full_mean(),
            ma_10: long.full_mean(),
            volatility: bar.high - bar.low,
            target: bars.get(i + 1).map(|next| next.close),
        });
        prev_close = Some(bar.close);
    }
}
