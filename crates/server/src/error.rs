//! HTTP error mapping for the prediction service.
//!
//! Every variant declares its status code; the body is always
//! `{ "error": <message>, "status": <code> }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use model::PredictError;
use serde_json::json;

/// Handler error with an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Unknown company (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Known company the request cannot be served for (422).
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    /// Malformed request values (400).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Model and features disagree (500).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::UnknownCompany(_) => AppError::NotFound(err.to_string()),
            PredictError::NoFeatureRow(_) => AppError::Unprocessable(err.to_string()),
            PredictError::DimensionMismatch { .. } => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(msg)
            | AppError::Unprocessable(msg)
            | AppError::BadRequest(msg)
            | AppError::Internal(msg) => msg.clone(),
        };

        let body = axum::Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Result type for handlers.
pub type AppResult<T> = Result<T, AppError>;
