//! Serving next-day close predictions from a trained model.
//!
//! The predictor holds the model, its company encoder and the feature table
//! derived from a price history. Every lookup failure is a returned
//! [`PredictError`]; one unknown company never affects another request.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use features::{FeatureTable, FeatureVector, Quote, derive_features};
use serde::Serialize;
use storage::{normalize_company, read_trade_bars};
use tracing::info;
use types::TradeBar;

use crate::PriceModel;
use crate::error::{PredictError, Result};
use crate::train::TrainedModel;

/// Direction of the predicted move relative to the reference close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// `Up` only when the prediction is strictly above `close`.
    pub fn from_prices(predicted: f64, close: f64) -> Self {
        if predicted > close { Trend::Up } else { Trend::Down }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trend::Up => "UP",
            Trend::Down => "DOWN",
        })
    }
}

/// One served prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub company: String,
    /// Date of the feature row the prediction is based on.
    pub as_of: NaiveDate,
    /// Close the trend is measured against.
    pub close: f64,
    pub predicted_close: f64,
    pub trend: Trend,
}

/// Model plus the feature history it serves from.
#[derive(Debug)]
pub struct Predictor {
    model: TrainedModel,
    table: FeatureTable,
}

impl Predictor {
    /// Derive features for `bars` with the model's encoder.
    ///
    /// Bars of companies the model never saw are dropped.
    pub fn new(model: TrainedModel, bars: &[TradeBar]) -> Self {
        let table = derive_features(bars, model.encoder());
        info!(
            companies = table.companies().len(),
            rows = table.len(),
            unknown_bars = table.unknown_bars,
            "predictor ready"
        );
        Self { model, table }
    }

    /// Build from a price CSV on disk.
    pub fn from_price_file(model: TrainedModel, path: &Path) -> Result<Self> {
        let prices = read_trade_bars(path)?;
        Ok(Self::new(model, &prices.bars))
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    /// Companies with history, sorted.
    pub fn companies(&self) -> Vec<&str> {
        self.table.companies()
    }

    /// OHLC of the company's latest bar.
    pub fn latest_ohlc(&self, company: &str) -> std::result::Result<Quote, PredictError> {
        let company = self.resolve(company)?;
        self.table
            .latest(&company)
            .map(Quote::from)
            .ok_or(PredictError::NoFeatureRow(company))
    }

    /// Predict the close after the company's latest complete row.
    pub fn predict_next(&self, company: &str) -> std::result::Result<Prediction, PredictError> {
        let company = self.resolve(company)?;
        let Some(row) = self.table.latest_complete(&company) else {
            return Err(PredictError::NoFeatureRow(company));
        };
        let x = row
            .features()
            .ok_or_else(|| PredictError::NoFeatureRow(company.clone()))?;
        let predicted_close = self.run(&x)?;
        Ok(Prediction {
            trend: Trend::from_prices(predicted_close, row.close),
            company,
            as_of: row.trade_date,
            close: row.close,
            predicted_close,
        })
    }

    /// Predict from a caller-supplied bar.
    ///
    /// The bar replaces OHLC and volatility of the latest complete row; the
    /// lag and trailing features stay those of that row.
    pub fn predict_from_quote(
        &self,
        company: &str,
        quote: Quote,
    ) -> std::result::Result<Prediction, PredictError> {
        let company = self.resolve(company)?;
        let Some(row) = self.table.latest_complete(&company) else {
            return Err(PredictError::NoFeatureRow(company));
        };
        let x = row
            .with_quote(&quote)
            .ok_or_else(|| PredictError::NoFeatureRow(company.clone()))?;
        let predicted_close = self.run(&x)?;
        Ok(Prediction {
            trend: Trend::from_prices(predicted_close, quote.close),
            company,
            as_of: row.trade_date,
            close: quote.close,
            predicted_close,
        })
    }

    /// Normalized name of a company the model knows.
    pub fn resolve(&self, company: &str) -> std::result::Result<String, PredictError> {
        let company = normalize_company(company);
        if self.model.encoder().contains(&company) {
            Ok(company)
        } else {
            Err(PredictError::UnknownCompany(company))
        }
    }

    fn run(&self, x: &FeatureVector) -> std::result::Result<f64, PredictError> {
        let regressor = self.model.regressor();
        if regressor.n_features() != x.len() {
            return Err(PredictError::DimensionMismatch {
                expected: regressor.n_features(),
                got: x.len(),
            });
        }
        Ok(regressor.predict(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::train::{ModelKind, TrainConfig, train};
    use chrono::Days;

    fn bars(company: &str, n: u64) -> Vec<TradeBar> {
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                TradeBar {
                    company: company.to_string(),
                    trade_date: first + Days::new(i),
                    open: close - 1.0,
                    high: close + 1.0,
                    low: close - 2.0,
                    close,
                }
            })
            .collect()
    }

    fn predictor() -> Predictor {
        let history = bars("TCS", 40);
        let config = TrainConfig::default().with_kind(ModelKind::Linear);
        let model = train(&history, &config).unwrap();
        let mut serving = history;
        serving.extend(bars("ACME", 5));
        Predictor::new(model, &serving)
    }

    #[test]
    fn test_trend_strictly_above() {
        assert_eq!(Trend::from_prices(10.1, 10.0), Trend::Up);
        assert_eq!(Trend::from_prices(10.0, 10.0), Trend::Down);
        assert_eq!(Trend::Up.to_string(), "UP");
    }

    #[test]
    fn test_predict_next_normalizes_name() {
        let predictor = predictor();
        let prediction = predictor.predict_next("  tcs ").unwrap();
        assert_eq!(prediction.company, "TCS");
        assert_eq!(prediction.close, 139.0);
        assert!((prediction.predicted_close - 140.0).abs() < 0.5);
        assert_eq!(prediction.trend, Trend::Up);
    }

    #[test]
    fn test_unknown_company_is_reported() {
        let predictor = predictor();
        assert_eq!(
            predictor.predict_next("ACME"),
            Err(PredictError::UnknownCompany("ACME".into()))
        );
        assert!(predictor.latest_ohlc("nope").is_err());
        // Other companies still serve.
        assert!(predictor.predict_next("TCS").is_ok());
        assert_eq!(predictor.companies(), vec!["TCS"]);
    }

    #[test]
    fn test_latest_ohlc_and_quote() {
        let predictor = predictor();
        let latest = predictor.latest_ohlc("TCS").unwrap();
        assert_eq!(latest.close, 139.0);
        assert_eq!(latest.high, 140.0);

        let quote = Quote {
            open: 100.0,
            high: 101.0,
            low: 95.0,
            close: 96.0,
        };
        let prediction = predictor.predict_from_quote("TCS", quote).unwrap();
        assert_eq!(prediction.close, 96.0);
        assert_eq!(
            prediction.trend,
            Trend::from_prices(prediction.predicted_close, 96.0)
        );
    }

    #[test]
    fn test_known_company_without_history() {
        let history = bars("TCS", 40);
        let config = TrainConfig::default().with_kind(ModelKind::Linear);
        let model = train(&history, &config).unwrap();
        let predictor = Predictor::new(model, &bars("TCS", 4));
        assert_eq!(
            predictor.predict_next("TCS"),
            Err(PredictError::NoFeatureRow("TCS".into()))
        );
        assert!(predictor.latest_ohlc("TCS").is_ok());
    }
}
