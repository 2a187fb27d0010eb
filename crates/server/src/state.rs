//! Shared handler state.

use std::sync::Arc;

use model::Predictor;

/// The predictor every handler reads from.
///
/// Serving never mutates it, so handlers share one `Arc` without locking.
#[derive(Debug, Clone)]
pub struct AppState {
    predictor: Arc<Predictor>,
}

impl AppState {
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor: Arc::new(predictor),
        }
    }

    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }
}

/// Linear model over two trending companies, served from the same bars.
#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    use chrono::{Days, NaiveDate};
    use model::{ModelKind, TrainConfig, train};
    use types::TradeBar;

    let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let bars: Vec<TradeBar> = ["TCS", "INFY"]
        .iter()
        .flat_map(|company| {
            (0..40u64).map(move |i| {
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
        })
        .collect();
    let config = TrainConfig::default().with_kind(ModelKind::Linear);
    let model = train(&bars, &config).unwrap();
    AppState::new(Predictor::new(model, &bars))
}
