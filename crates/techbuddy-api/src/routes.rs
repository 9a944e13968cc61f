//! Router setup with all API routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use techbuddy_core::config::ServerConfig;
use techbuddy_core::TechBuddyError;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
///
/// CORS is permissive: the chat page may be served from anywhere,
/// including a public tunnel URL.
pub fn create_router(state: AppState) -> Router {
    // Routes that do NOT require the API key.
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::status));

    let protected_routes = Router::new()
        .route("/chat", post(handlers::chat))
        .route("/kpi-metrics", get(handlers::kpi_metrics))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_api_key,
        ));

    public_routes
        .merge(protected_routes)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `host:port` and serve until the process exits.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), TechBuddyError> {
    let addr = format!("{}:{}", config.host, config.port);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TechBuddyError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Starting API server on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| TechBuddyError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
