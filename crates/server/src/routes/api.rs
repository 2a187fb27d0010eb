//! Prediction endpoints.
//!
//! - `GET /companies`: companies the model can serve, sorted
//! - `GET /latest/{company}`: OHLC of the company's latest bar
//! - `POST /predict`: next close from a supplied bar plus stored history
//!
//! Company names are trimmed and uppercased before lookup.

use axum::Json;
use axum::extract::{Path, State};
use features::Quote;
use model::Trend;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Latest bar: `{ company, open, high, low, close }`.
#[derive(Debug, Serialize)]
pub struct LatestResponse {
    pub company: String,
    #[serde(flatten)]
    pub quote: Quote,
}

/// Prediction request body.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub company: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PredictRequest {
    fn quote(&self) -> AppResult<Quote> {
        let values = [self.open, self.high, self.low, self.close];
        if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(AppError::BadRequest("prices must be positive".into()));
        }
        if self.high < self.low {
            return Err(AppError::BadRequest(format!(
                "high {} below low {}",
                self.high, self.low
            )));
        }
        Ok(Quote {
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
        })
    }
}

/// Prediction response.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub company: String,
    /// Predicted next close, 2 decimals.
    pub prediction: f64,
    pub trend: Trend,
}

/// `GET /companies`
pub async fn get_companies(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .predictor()
            .companies()
            .into_iter()
            .map(str::to_string)
            .collect(),
    )
}

/// `GET /latest/{company}`
pub async fn get_latest(
    State(state): State<AppState>,
    Path(company): Path<String>,
) -> AppResult<Json<LatestResponse>> {
    let predictor = state.predictor();
    let company = predictor.resolve(&company)?;
    let quote = predictor.latest_ohlc(&company)?;
    Ok(Json(LatestResponse { company, quote }))
}

/// `POST /predict`
pub async fn post_predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> AppResult<Json<PredictResponse>> {
    let quote = req.quote()?;
    let prediction = state.predictor().predict_from_quote(&req.company, quote)?;
    debug!(
        company = %prediction.company,
        predicted = prediction.predicted_close,
        "served prediction"
    );
    Ok(Json(PredictResponse {
        prediction: (prediction.predicted_close * 100.0).round() / 100.0,
        trend: prediction.trend,
        company: prediction.company,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use axum::http::StatusCode;

    fn request(company: &str, close: f64) -> PredictRequest {
        PredictRequest {
            company: company.to_string(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
        }
    }

    #[tokio::test]
    async fn test_get_companies() {
        let Json(companies) = get_companies(State(test_state())).await;
        assert_eq!(companies, vec!["INFY", "TCS"]);
    }

    #[tokio::test]
    async fn test_get_latest_normalizes_company() {
        let Json(latest) = get_latest(State(test_state()), Path(" tcs ".into()))
            .await
            .unwrap();
        assert_eq!(latest.company, "TCS");
        assert_eq!(latest.quote.close, 139.0);

        let json = serde_json::to_value(&latest).unwrap();
        assert_eq!(json["high"], 140.0);
        assert_eq!(json["company"], "TCS");
    }

    #[tokio::test]
    async fn test_get_latest_unknown_company() {
        let err = get_latest(State(test_state()), Path("ACME".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_predict() {
        let Json(response) = post_predict(State(test_state()), Json(request("tcs", 139.0)))
            .await
            .unwrap();
        assert_eq!(response.company, "TCS");
        assert_eq!(response.prediction, (response.prediction * 100.0).round() / 100.0);
        assert!((response.prediction - 140.0).abs() < 0.5);
        assert_eq!(response.trend, Trend::Up);

        let json = serde_json::to_value(&response).unwrap();
        assert!(json["trend"] == "UP" || json["trend"] == "DOWN");
    }

    #[tokio::test]
    async fn test_post_predict_errors() {
        let unknown = post_predict(State(test_state()), Json(request("ACME", 50.0)))
            .await
            .unwrap_err();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let mut inverted = request("TCS", 100.0);
        inverted.high = 90.0;
        let bad = post_predict(State(test_state()), Json(inverted))
            .await
            .unwrap_err();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_predict_request_parsing() {
        let json = r#"{"company": "TCS", "open": 10, "high": 12, "low": 9, "close": 11}"#;
        let req: PredictRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.quote().unwrap().close, 11.0);
    }
}
