//! Shared API key authentication.
//!
//! A fresh key is generated for every process and must be sent in the
//! `X-API-Key` header on protected endpoints.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use rand::Rng;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Generate a random 64-character hex key (32 bytes).
pub fn generate_api_key() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Middleware that rejects requests without the expected `X-API-Key`.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(key) if !key.is_empty() && key == state.api_key => next.run(req).await,
        _ => {
            tracing::debug!(path = %req.uri().path(), "Rejected request with invalid API key");
            ApiError::Unauthorized("Invalid API key".to_string()).into_response()
        }
    }
}
