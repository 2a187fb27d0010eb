//! HTTP serving for the next-day close model.
//!
//! A thin axum layer over [`model::Predictor`]: handlers resolve the company,
//! call the predictor and map [`model::PredictError`] to JSON error bodies.
//!
//! # Modules
//!
//! - [`app`]: router, CORS and trace layers, listen loop
//! - [`state`]: the shared predictor
//! - [`error`]: HTTP status mapping
//! - [`routes`]: status and prediction handlers

pub mod app;
pub mod error;
pub mod routes;
pub mod state;

pub use app::{ServerConfig, create_app, serve};
pub use error::{AppError, AppResult};
pub use state::AppState;
