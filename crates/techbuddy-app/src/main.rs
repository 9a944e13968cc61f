//! TechBuddy server entry point.
//!
//! Loads configuration, wires the completion backend into the session
//! engine and serves the HTTP API.

mod cli;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use techbuddy_api::auth::generate_api_key;
use techbuddy_api::{start_server, AppState};
use techbuddy_chat::{EngineSettings, SessionEngine};
use techbuddy_core::{TechBuddyConfig, TechBuddyError};
use techbuddy_llm::{CompletionGateway, DeadlineGateway, OpenAiGateway};

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = TechBuddyConfig::load_or_default(&config_file);

    // Tracing. RUST_LOG wins over the flag and the config file.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .init();

    tracing::info!("Starting TechBuddy v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    config.server.port = args.resolve_port(config.server.port);
    config.server.host = args.resolve_host(&config.server.host);

    // Completion backend.
    let backend_key = std::env::var(&config.llm.api_key_env).map_err(|_| {
        TechBuddyError::Config(format!(
            "environment variable {} is not set",
            config.llm.api_key_env
        ))
    })?;
    let openai = OpenAiGateway::new(&config.llm.base_url, &backend_key, &config.llm.model)
        .map_err(|e| TechBuddyError::Gateway(e.to_string()))?;
    tracing::info!(model = openai.model(), base_url = %config.llm.base_url, "Completion backend configured");

    let gateway: Arc<dyn CompletionGateway> = if config.llm.timeout_secs > 0 {
        Arc::new(DeadlineGateway::new(
            Arc::new(openai),
            Duration::from_secs(config.llm.timeout_secs),
        ))
    } else {
        Arc::new(openai)
    };

    // Engine.
    let engine = SessionEngine::builder(gateway)
        .with_settings(EngineSettings::from(&config))
        .with_personality(config.personality.clone())
        .build();

    // API.
    let state = AppState::new(Arc::new(engine), generate_api_key())
        .with_public_url(config.server.public_url.clone())
        .with_user_name(config.personality.user_name.clone());
    tracing::info!("API key generated; clients fetch it from GET /status");

    start_server(&config.server, state).await?;
    Ok(())
}
