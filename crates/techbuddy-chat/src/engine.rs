//! Session engine: survey interception, chat turns and KPI bookkeeping.
//!
//! Turns are serialized by an async turn gate held across the backend call.
//! Session state sits behind a separate lock that is only taken for
//! synchronous reads and writes, so metrics stay readable while a turn
//! waits on the backend.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use techbuddy_core::{Personality, TechBuddyConfig};
use techbuddy_llm::{CompletionGateway, CompletionRequest};

use crate::kpi::KpiReport;
use crate::prompt::build_system_prompt;
use crate::providers::{Clock, RandomSource, SystemClock, UniformRandom};
use crate::session::Session;
use crate::survey::{SurveyAnswer, SurveyKind};
use crate::types::TurnResult;

/// Tunables of the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    /// History entries sent as context.
    pub context_window: usize,
    pub trigger_probability: f64,
    /// A survey opens only when history is strictly longer than this.
    pub min_history_entries: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 150,
            context_window: 5,
            trigger_probability: 0.2,
            min_history_entries: 4,
        }
    }
}

impl From<&TechBuddyConfig> for EngineSettings {
    fn from(config: &TechBuddyConfig) -> Self {
        Self {
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            context_window: config.survey.context_window,
            trigger_probability: config.survey.trigger_probability,
            min_history_entries: config.survey.min_history_entries,
        }
    }
}

struct EngineState {
    session: Session,
    random: Box<dyn RandomSource>,
}

/// Owns the single session and is its only writer.
pub struct SessionEngine {
    session_id: Uuid,
    turn_gate: tokio::sync::Mutex<()>,
    state: Mutex<EngineState>,
    gateway: Arc<dyn CompletionGateway>,
    clock: Arc<dyn Clock>,
    settings: EngineSettings,
}

/// Builder for [`SessionEngine`]. Defaults: wall clock, OS-seeded random
/// source, default settings and personality.
pub struct EngineBuilder {
    gateway: Arc<dyn CompletionGateway>,
    clock: Arc<dyn Clock>,
    random: Box<dyn RandomSource>,
    settings: EngineSettings,
    personality: Personality,
}

impl EngineBuilder {
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    pub fn build(self) -> SessionEngine {
        let started_at = self.clock.now();
        let system_prompt = build_system_prompt(&self.personality, started_at);
        let session = Session::new(system_prompt, started_at);
        let session_id = session.id();

        info!(
            session_id = %session_id,
            gateway = self.gateway.name(),
            "Session engine started"
        );

        SessionEngine {
            session_id,
            turn_gate: tokio::sync::Mutex::new(()),
            state: Mutex::new(EngineState {
                session,
                random: self.random,
            }),
            gateway: self.gateway,
            clock: self.clock,
            settings: self.settings,
        }
    }
}

impl SessionEngine {
    pub fn builder(gateway: Arc<dyn CompletionGateway>) -> EngineBuilder {
        EngineBuilder {
            gateway,
            clock: Arc::new(SystemClock),
            random: Box::new(UniformRandom::new()),
            settings: EngineSettings::default(),
            personality: Personality::default(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Process one user message.
    ///
    /// Never fails: backend errors and invalid survey answers come back as
    /// result variants and leave the session exactly as it was.
    pub async fn handle_turn(&self, user_text: &str) -> TurnResult {
        let _turn = self.turn_gate.lock().await;

        let request = {
            let mut state = self.lock_state();
            if let Some(kind) = state.session.active_survey() {
                return self.answer_survey(&mut state.session, kind, user_text);
            }
            CompletionRequest::new(
                state
                    .session
                    .context_messages(self.settings.context_window, user_text),
                self.settings.temperature,
                self.settings.max_tokens,
            )
        };

        self.chat_turn(request, user_text).await
    }

    /// Compute the KPI report as of now. Does not modify the session and
    /// does not wait for an in-flight turn.
    pub async fn snapshot_metrics(&self) -> KpiReport {
        let state = self.lock_state();
        state.session.kpis().snapshot(self.clock.now())
    }

    /// Read the session under the state lock.
    pub async fn inspect<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let state = self.lock_state();
        f(&state.session)
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn answer_survey(&self, session: &mut Session, kind: SurveyKind, input: &str) -> TurnResult {
        let Some(answer) = kind.parse_answer(input) else {
            debug!(session_id = %self.session_id, survey = %kind, "Rejected survey answer");
            return TurnResult::SurveyError {
                prompt: kind.prompt().to_string(),
            };
        };

        let now = self.clock.now();
        match answer {
            SurveyAnswer::Rating(score) => session.kpis_mut().record_satisfaction(score, now),
            SurveyAnswer::Area(area) => session.kpis_mut().record_improvement(area, now),
            SurveyAnswer::Resolved(true) => session.kpis_mut().record_resolution(),
            SurveyAnswer::Resolved(false) => {}
        }

        let next = kind.next();
        session.set_active_survey(next);

        match next {
            Some(next) => {
                debug!(session_id = %self.session_id, survey = %kind, next = %next, "Survey answer recorded");
                TurnResult::SurveyFollowup {
                    acknowledgement: answer.acknowledgement(),
                    prompt: next.prompt().to_string(),
                }
            }
            None => {
                info!(
                    session_id = %self.session_id,
                    resolved = matches!(answer, SurveyAnswer::Resolved(true)),
                    "Survey completed"
                );
                TurnResult::SurveyComplete
            }
        }
    }

    /// Call the backend, then apply the exchange. Only the turn gate is held
    /// during the call; session state is untouched until it returns.
    async fn chat_turn(&self, request: CompletionRequest, user_text: &str) -> TurnResult {
        let started = self.clock.now();
        let reply = match self.gateway.complete(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    session_id = %self.session_id,
                    gateway = self.gateway.name(),
                    error = %e,
                    "Completion failed"
                );
                return TurnResult::EngineError {
                    message: e.to_string(),
                };
            }
        };
        let finished = self.clock.now();
        let elapsed = elapsed_seconds(started, finished);

        let mut state = self.lock_state();
        state.session.push_exchange(user_text, &reply);
        state.session.kpis_mut().record_query(elapsed, finished);

        // The draw is taken on every successful turn, whatever the history length.
        let draw = state.random.next_unit();
        let history_len = state.session.history().len();
        let open_survey = draw < self.settings.trigger_probability
            && history_len > self.settings.min_history_entries;

        debug!(
            session_id = %self.session_id,
            elapsed_secs = elapsed,
            history_len,
            survey = open_survey,
            "Chat turn completed"
        );

        if open_survey {
            state.session.set_active_survey(Some(SurveyKind::Satisfaction));
            TurnResult::SurveyRequest {
                text: reply,
                followup_prompt: SurveyKind::Satisfaction.prompt().to_string(),
            }
        } else {
            TurnResult::Chat { text: reply }
        }
    }
}

fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let delta = end - start;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1000.0,
    }
}
