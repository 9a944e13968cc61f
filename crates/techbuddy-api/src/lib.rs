//! TechBuddy HTTP API.
//!
//! Exposes the session engine over axum: `POST /chat` for turns,
//! `GET /kpi-metrics` for the KPI report, plus public `/status` and
//! `/health` endpoints.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
