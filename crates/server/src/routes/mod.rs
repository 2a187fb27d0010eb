//! Route handlers.
//!
//! - [`health`]: service status
//! - [`api`]: companies, latest bar and next-close prediction

pub mod api;
pub mod health;
