use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TechBuddyError};

/// Top-level configuration for the TechBuddy application.
///
/// Loaded from `~/.techbuddy/config.toml` by default. Every section falls
/// back to its defaults when omitted, so an empty file is a valid config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechBuddyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub personality: Personality,
    #[serde(default)]
    pub survey: SurveyConfig,
}

impl TechBuddyConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TechBuddyConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist, cannot be parsed, or is invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the engine or the completion backend cannot work with.
    pub fn validate(&self) -> Result<()> {
        let p = self.survey.trigger_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(TechBuddyError::Config(format!(
                "survey.trigger_probability must be within [0, 1], got {}",
                p
            )));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(TechBuddyError::Config(format!(
                "llm.temperature must be within [0, 2], got {}",
                self.llm.temperature
            )));
        }
        if self.llm.max_tokens == 0 {
            return Err(TechBuddyError::Config(
                "llm.max_tokens must be greater than zero".to_string(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(TechBuddyError::Config(
                "llm.model must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Publicly reachable URL (e.g. a tunnel), reported by `/status`.
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            public_url: String::new(),
        }
    }
}

/// Completion backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API. `/v1` is appended.
    pub base_url: String,
    /// Model name sent with every completion request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens per reply.
    pub max_tokens: u32,
    /// Per-call deadline in seconds. 0 disables the deadline.
    pub timeout_secs: u64,
    /// Environment variable holding the backend API key.
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 150,
            timeout_secs: 0,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// The assistant's persona, rendered into the system prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Personality {
    pub name: String,
    pub role: String,
    pub tone: String,
    pub expertise: String,
    /// Label of the current user. Omitted from the prompt when empty.
    pub user_name: String,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            name: "TechBuddy".to_string(),
            role: "customer_service".to_string(),
            tone: "friendly and professional".to_string(),
            expertise: "tech support".to_string(),
            user_name: String::new(),
        }
    }
}

/// Feedback survey scheduling and context window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// Chance that a successful chat turn opens a satisfaction survey.
    pub trigger_probability: f64,
    /// A survey is only offered once history holds more entries than this.
    pub min_history_entries: usize,
    /// Number of trailing history entries sent as context.
    pub context_window: usize,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            trigger_probability: 0.2,
            min_history_entries: 4,
            context_window: 5,
        }
    }
}
