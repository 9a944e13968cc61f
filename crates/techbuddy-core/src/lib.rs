//! Shared configuration and error types for TechBuddy.

pub mod config;
pub mod error;

pub use config::{Personality, TechBuddyConfig};
pub use error::{Result, TechBuddyError};
