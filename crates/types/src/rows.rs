//! Row types for every output table.
//!
//! Field order is the CSV column order; downstream consumers depend on it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{IndexName, Market, Sector, Ticker};

/// One simulated trading day for a (market, company) pair.
///
/// Columns: `date, market, company, open, high, low, close`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub market: Market,
    pub company: Ticker,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Columns: `date, index, value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRow {
    pub date: NaiveDate,
    pub index: IndexName,
    pub value: f64,
}

/// Valuation ratios for one company; no date dimension.
///
/// Columns: `company, sector, pe_ratio, debt_equity, roe`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsRow {
    pub company: Ticker,
    pub sector: Sector,
    pub pe_ratio: f64,
    pub debt_equity: f64,
    pub roe: f64,
}

/// Columns: `date, company, sentiment_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRow {
    pub date: NaiveDate,
    pub company: Ticker,
    pub sentiment_score: f64,
}

/// Columns: `date, company, volume`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeRow {
    pub date: NaiveDate,
    pub company: Ticker,
    pub volume: u64,
}

/// Columns: `date, inflation, interest_rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroRow {
    pub date: NaiveDate,
    pub inflation: f64,
    pub interest_rate: f64,
}

/// Price bar as seen by the feature pipeline and the predictor.
///
/// Same data as [`PriceRow`] without the market, with `date` renamed to
/// `trade_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeBar {
    pub company: Ticker,
    pub trade_date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl From<&PriceRow> for TradeBar {
    fn from(row: &PriceRow) -> Self {
        Self {
            company: row.company.clone(),
            trade_date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_bar_from_price_row() {
        let row = PriceRow {
            date: NaiveDate::from_ymd_opt(2015, 1, 2).unwrap(),
            market: Market::Nse,
            company: "TCS".to_string(),
            open: 101.5,
            high: 103.0,
            low: 100.25,
            close: 102.0,
        };
        let bar = TradeBar::from(&row);
        assert_eq!(bar.company, "TCS");
        assert_eq!(bar.trade_date, row.date);
        assert_eq!(bar.close, 102.0);
    }
}
