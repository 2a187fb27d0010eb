//! Service status: `GET /`

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    /// `linear` or `random_forest`.
    pub model_type: &'static str,
    /// Companies with price history.
    pub companies: usize,
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let predictor = state.predictor();
    Json(StatusResponse {
        status: "running",
        model_type: predictor.model().regressor().kind().as_str(),
        companies: predictor.companies().len(),
    })
}
