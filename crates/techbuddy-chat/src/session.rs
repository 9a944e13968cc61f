//! Typed per-session state.

use chrono::{DateTime, Utc};
use techbuddy_llm::ChatMessage;
use uuid::Uuid;

use crate::kpi::KpiAccumulator;
use crate::survey::SurveyKind;
use crate::types::Message;

/// All state of the single conversation the engine serves.
///
/// History is append-only; the survey slot and the KPI accumulator are only
/// mutated by the engine while it holds the session lock.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    system_prompt: String,
    history: Vec<Message>,
    active_survey: Option<SurveyKind>,
    kpis: KpiAccumulator,
}

impl Session {
    pub fn new(system_prompt: String, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            system_prompt,
            history: Vec::new(),
            active_survey: None,
            kpis: KpiAccumulator::new(started_at),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn active_survey(&self) -> Option<SurveyKind> {
        self.active_survey
    }

    pub fn kpis(&self) -> &KpiAccumulator {
        &self.kpis
    }

    pub(crate) fn kpis_mut(&mut self) -> &mut KpiAccumulator {
        &mut self.kpis
    }

    pub(crate) fn set_active_survey(&mut self, survey: Option<SurveyKind>) {
        self.active_survey = survey;
    }

    /// Append one completed exchange, user first.
    pub(crate) fn push_exchange(&mut self, user_text: &str, reply: &str) {
        self.history.push(Message::user(user_text));
        self.history.push(Message::assistant(reply));
    }

    /// Messages for a completion request: system prompt, the trailing
    /// `window` history entries oldest first, then `user_text`.
    pub fn context_messages(&self, window: usize, user_text: &str) -> Vec<ChatMessage> {
        let skip = self.history.len().saturating_sub(window);
        let mut messages = Vec::with_capacity(window + 2);
        messages.push(ChatMessage::system(self.system_prompt.clone()));
        messages.extend(self.history[skip..].iter().map(ChatMessage::from));
        messages.push(ChatMessage::user(user_text));
        messages
    }
}
