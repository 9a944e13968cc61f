//! Route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use techbuddy_chat::{KpiReport, TurnResponse};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `POST /chat`.
#[derive(Debug, Deserialize, Serialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `GET /status`.
#[derive(Debug, Deserialize, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub url: String,
    pub api_key: String,
    pub server_time: String,
    pub user: String,
}

/// Body of `GET /health`.
#[derive(Debug, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub session_id: Uuid,
}

/// GET /health - liveness.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        session_id: state.engine.session_id(),
    })
}

/// GET /status - bootstrap data for the browser client, including the key.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online".to_string(),
        url: state.public_url.clone(),
        api_key: state.api_key.clone(),
        server_time: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        user: state.user_name.clone(),
    })
}

/// POST /chat - run one turn through the session engine.
///
/// Engine-level failures are still a 200; the body's `type` tells the
/// client what happened.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<TurnResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let message = match request.message {
        Some(message) if !message.is_empty() => message,
        _ => return Err(ApiError::BadRequest("No message provided".to_string())),
    };

    let result = state.engine.handle_turn(&message).await;
    let response = TurnResponse::from(result);
    tracing::debug!(kind = %response.kind, "Chat turn served");
    Ok(Json(response))
}

/// GET /kpi-metrics - current KPI report.
pub async fn kpi_metrics(State(state): State<AppState>) -> Json<KpiReport> {
    Json(state.engine.snapshot_metrics().await)
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Resource not found".to_string())
}
