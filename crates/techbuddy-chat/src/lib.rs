//! Session engine for TechBuddy.
//!
//! Decides for every user message whether it answers a pending feedback
//! survey or is a normal chat turn for the completion backend, keeps the
//! conversation history, schedules surveys and aggregates service KPIs.

pub mod engine;
pub mod kpi;
pub mod prompt;
pub mod providers;
pub mod session;
pub mod survey;
pub mod types;

pub use engine::{EngineBuilder, EngineSettings, SessionEngine};
pub use kpi::{
    EngagementEvent, EngagementKind, KpiAccumulator, KpiReport, ResponseTimeSample,
    SatisfactionSample,
};
pub use prompt::build_system_prompt;
pub use providers::{
    Clock, FixedDraw, ManualClock, RandomSource, ScriptedDraws, SystemClock, UniformRandom,
};
pub use session::Session;
pub use survey::{ImprovementArea, SurveyAnswer, SurveyKind, SURVEY_COMPLETE_MESSAGE};
pub use types::{Message, MessageRole, TurnKind, TurnResponse, TurnResult};
