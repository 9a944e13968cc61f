//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use techbuddy_chat::SessionEngine;

/// Shared application state.
///
/// The engine is the single owner of session state; everything else here
/// is fixed at startup.
#[derive(Clone)]
pub struct AppState {
    /// The one session engine served by this process.
    pub engine: Arc<SessionEngine>,
    /// Key expected in the `X-API-Key` header of protected routes.
    pub api_key: String,
    /// Publicly reachable URL reported by `/status`. May be empty.
    pub public_url: String,
    /// Current-user label reported by `/status`. May be empty.
    pub user_name: String,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: Arc<SessionEngine>, api_key: impl Into<String>) -> Self {
        Self {
            engine,
            api_key: api_key.into(),
            public_url: String::new(),
            user_name: String::new(),
            start_time: Instant::now(),
        }
    }

    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = url.into();
        self
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = user_name.into();
        self
    }
}
