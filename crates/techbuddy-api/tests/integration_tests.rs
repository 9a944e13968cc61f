//! Integration tests for the TechBuddy API.
//!
//! Each test builds its own engine over a scripted completion gateway and
//! drives the router with `oneshot`, so no network access is needed.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use techbuddy_api::create_router;
use techbuddy_api::handlers::{HealthResponse, StatusResponse};
use techbuddy_api::state::AppState;
use techbuddy_chat::{FixedDraw, RandomSource, ScriptedDraws, SessionEngine};
use techbuddy_llm::{CompletionGateway, CompletionRequest, GatewayError};

// =============================================================================
// Helpers
// =============================================================================

const TEST_KEY: &str = "test-key-0123456789abcdef";

/// Replays queued results, then answers "ok".
struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
}

impl ScriptedGateway {
    fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, GatewayError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn make_state_with(
    replies: Vec<Result<String, GatewayError>>,
    random: impl RandomSource + 'static,
) -> AppState {
    let engine = SessionEngine::builder(Arc::new(ScriptedGateway::new(replies)))
        .with_random(random)
        .build();
    AppState::new(Arc::new(engine), TEST_KEY)
        .with_public_url("https://example.test")
        .with_user_name("R2Vve")
}

fn make_app() -> axum::Router {
    create_router(make_state_with(vec![], FixedDraw(0.99)))
}

fn authed_get(uri: &str) -> Request<Body> {
    Request::get(uri)
        .header("x-api-key", TEST_KEY)
        .body(Body::empty())
        .unwrap()
}

fn authed_post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("x-api-key", TEST_KEY)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn chat_message(text: &str) -> Request<Body> {
    authed_post_json("/chat", &serde_json::json!({ "message": text }).to_string())
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

// =============================================================================
// Public endpoints
// =============================================================================

#[tokio::test]
async fn test_health_happy_path() {
    let resp = make_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.status, "healthy");
}

#[tokio::test]
async fn test_status_reports_key_and_url() {
    let resp = make_app()
        .oneshot(Request::get("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let status: StatusResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(status.status, "online");
    assert_eq!(status.api_key, TEST_KEY);
    assert_eq!(status.url, "https://example.test");
    assert_eq!(status.user, "R2Vve");
    assert_eq!(status.server_time.len(), "2025-01-23 03:40:31".len());
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let resp = make_app().oneshot(authed_get("/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Resource not found");
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_chat_without_key_is_401() {
    let req = Request::post("/chat")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"message":"hi"}"#))
        .unwrap();
    let resp = make_app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["error"], "Invalid API key");
}

#[tokio::test]
async fn test_kpi_with_wrong_key_is_401() {
    let req = Request::get("/kpi-metrics")
        .header("x-api-key", "wrong")
        .body(Body::empty())
        .unwrap();
    let resp = make_app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["error"], "Invalid API key");
}

#[tokio::test]
async fn test_rejected_request_does_not_reach_engine() {
    let state = make_state_with(vec![], FixedDraw(0.99));
    let app = create_router(state.clone());
    let req = Request::post("/chat")
        .header("x-api-key", "wrong")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"message":"hi"}"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(state.engine.snapshot_metrics().await.total_queries, 0);
}

// =============================================================================
// POST /chat
// =============================================================================

#[tokio::test]
async fn test_chat_happy_path() {
    let state = make_state_with(vec![Ok("Hold the power button.".to_string())], FixedDraw(0.99));
    let resp = create_router(state.clone())
        .oneshot(chat_message("My phone froze"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["response"], "Hold the power button.");
    assert_eq!(body["type"], "chat");
    assert!(body.get("follow_up").is_none());
    assert_eq!(state.engine.snapshot_metrics().await.total_queries, 1);
}

#[tokio::test]
async fn test_chat_missing_message_is_400() {
    let resp = make_app()
        .oneshot(authed_post_json("/chat", "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "No message provided");
}

#[tokio::test]
async fn test_chat_empty_message_is_400() {
    let resp = make_app()
        .oneshot(authed_post_json("/chat", r#"{"message":""}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "No message provided");
}

#[tokio::test]
async fn test_chat_malformed_json_is_400() {
    let resp = make_app()
        .oneshot(authed_post_json("/chat", "{not json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_gateway_failure_is_error_turn() {
    let state = make_state_with(vec![Err(GatewayError::EmptyResponse)], FixedDraw(0.0));
    let resp = create_router(state.clone())
        .oneshot(chat_message("hello"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["type"], "error");
    assert_eq!(
        body["response"],
        "I apologize, but I encountered an error: backend returned no completion"
    );
    assert_eq!(state.engine.snapshot_metrics().await.total_queries, 0);
}

#[tokio::test]
async fn test_survey_flow_over_http() {
    let state = make_state_with(vec![], ScriptedDraws::new([0.9, 0.9, 0.05]));
    let app = create_router(state.clone());

    for _ in 0..2 {
        let body = body_json(app.clone().oneshot(chat_message("help")).await.unwrap()).await;
        assert_eq!(body["type"], "chat");
    }

    let body = body_json(app.clone().oneshot(chat_message("help")).await.unwrap()).await;
    assert_eq!(body["type"], "survey_request");
    assert_eq!(body["follow_up"], "How satisfied are you with our service? (1-5)");

    let body = body_json(app.clone().oneshot(chat_message("9")).await.unwrap()).await;
    assert_eq!(body["type"], "survey_error");
    assert_eq!(
        body["response"],
        "Please provide a valid response for How satisfied are you with our service? (1-5)"
    );

    let body = body_json(app.clone().oneshot(chat_message("5")).await.unwrap()).await;
    assert_eq!(body["type"], "survey_followup");
    assert!(body["follow_up"]
        .as_str()
        .unwrap()
        .starts_with("What area should we improve?"));

    let body = body_json(app.clone().oneshot(chat_message("1")).await.unwrap()).await;
    assert_eq!(body["type"], "survey_followup");
    assert_eq!(
        body["response"],
        "Thank you for suggesting we improve our Response Time."
    );
    assert_eq!(body["follow_up"], "Was your issue resolved? (yes/no)");

    let body = body_json(app.clone().oneshot(chat_message("Yes")).await.unwrap()).await;
    assert_eq!(body["type"], "survey_complete");

    let metrics = body_json(app.oneshot(authed_get("/kpi-metrics")).await.unwrap()).await;
    assert_eq!(metrics["total_queries"], 3);
    assert_eq!(metrics["resolved_queries"], 1);
    assert_eq!(metrics["average_satisfaction"], 5.0);
    assert_eq!(metrics["resolution_rate"], 33.33);
}

// =============================================================================
// GET /kpi-metrics
// =============================================================================

#[tokio::test]
async fn test_kpi_metrics_fresh_session() {
    let resp = make_app().oneshot(authed_get("/kpi-metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["total_queries"], 0);
    assert_eq!(body["resolved_queries"], 0);
    assert_eq!(body["average_satisfaction"], 0.0);
    assert_eq!(body["resolution_rate"], 0.0);
    assert!(body["timestamp"].as_str().unwrap().ends_with(" UTC"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let req = Request::get("/health")
        .header("origin", "https://somewhere.example")
        .body(Body::empty())
        .unwrap();
    let resp = make_app().oneshot(req).await.unwrap();
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
