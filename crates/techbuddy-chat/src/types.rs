//! Conversation history entries and turn outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};
use techbuddy_llm::ChatMessage;

use crate::survey::SURVEY_COMPLETE_MESSAGE;

/// Author of a history entry. The system prompt is never stored in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One entry of the session's conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
        }
    }
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        match message.role {
            MessageRole::User => ChatMessage::user(message.text.clone()),
            MessageRole::Assistant => ChatMessage::assistant(message.text.clone()),
        }
    }
}

/// Outcome of a single call to `SessionEngine::handle_turn`.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnResult {
    /// Normal reply from the completion backend.
    Chat { text: String },
    /// Normal reply, and a satisfaction survey has just been opened.
    SurveyRequest {
        text: String,
        followup_prompt: String,
    },
    /// A survey answer was accepted and the next stage is pending.
    SurveyFollowup {
        acknowledgement: String,
        prompt: String,
    },
    /// The last survey stage was answered.
    SurveyComplete,
    /// The answer did not match the pending stage. Nothing changed.
    SurveyError { prompt: String },
    /// The completion backend failed. Nothing changed.
    EngineError { message: String },
}

impl TurnResult {
    pub fn kind(&self) -> TurnKind {
        match self {
            TurnResult::Chat { .. } => TurnKind::Chat,
            TurnResult::SurveyRequest { .. } => TurnKind::SurveyRequest,
            TurnResult::SurveyFollowup { .. } => TurnKind::SurveyFollowup,
            TurnResult::SurveyComplete => TurnKind::SurveyComplete,
            TurnResult::SurveyError { .. } => TurnKind::SurveyError,
            TurnResult::EngineError { .. } => TurnKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            TurnResult::SurveyError { .. } | TurnResult::EngineError { .. }
        )
    }
}

/// Wire tag of a [`TurnResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    Chat,
    SurveyRequest,
    SurveyFollowup,
    SurveyComplete,
    SurveyError,
    Error,
}

impl fmt::Display for TurnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnKind::Chat => write!(f, "chat"),
            TurnKind::SurveyRequest => write!(f, "survey_request"),
            TurnKind::SurveyFollowup => write!(f, "survey_followup"),
            TurnKind::SurveyComplete => write!(f, "survey_complete"),
            TurnKind::SurveyError => write!(f, "survey_error"),
            TurnKind::Error => write!(f, "error"),
        }
    }
}

/// JSON body returned to the chat client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub response: String,
    #[serde(rename = "type")]
    pub kind: TurnKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
}

impl From<TurnResult> for TurnResponse {
    fn from(result: TurnResult) -> Self {
        let kind = result.kind();
        let (response, follow_up) = match result {
            TurnResult::Chat { text } => (text, None),
            TurnResult::SurveyRequest {
                text,
                followup_prompt,
            } => (text, Some(followup_prompt)),
            TurnResult::SurveyFollowup {
                acknowledgement,
                prompt,
            } => (acknowledgement, Some(prompt)),
            TurnResult::SurveyComplete => (SURVEY_COMPLETE_MESSAGE.to_string(), None),
            TurnResult::SurveyError { prompt } => {
                (format!("Please provide a valid response for {}", prompt), None)
            }
            TurnResult::EngineError { message } => (
                format!("I apologize, but I encountered an error: {}", message),
                None,
            ),
        };
        Self {
            response,
            kind,
            follow_up,
        }
    }
}
