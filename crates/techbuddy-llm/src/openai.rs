//! OpenAI-compatible chat-completions gateway.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

use crate::api::{ChatMessage, CompletionRequest};
use crate::error::GatewayError;
use crate::gateway::CompletionGateway;

const API_VERSION: &str = "v1";

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Calls `POST {base_url}/v1/chat/completions` with a bearer key.
#[derive(Clone)]
pub struct OpenAiGateway {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAiGateway {
    /// Build a gateway for `model` behind `base_url` (e.g. `https://api.openai.com`).
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| GatewayError::Config("API key contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let base_url = base_url.trim_end_matches('/');
        Ok(Self {
            client,
            base_url: format!("{}/{}", base_url, API_VERSION),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    #[instrument(level = "debug", skip(self, request), fields(model = %self.model, messages = request.messages.len()))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(self.completions_url())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        trace!(response = %text, "Completion response received");

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GatewayError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
