//! Completion gateway for TechBuddy.
//!
//! A narrow abstraction over a remote text-completion call: role-tagged
//! messages plus generation parameters in, generated text or a
//! [`GatewayError`] out. Implementations never retry and hold no
//! conversation state.

pub mod api;
pub mod error;
pub mod gateway;
pub mod openai;

pub use api::{ChatMessage, CompletionRequest, Role};
pub use error::GatewayError;
pub use gateway::{CompletionGateway, DeadlineGateway};
pub use openai::OpenAiGateway;
