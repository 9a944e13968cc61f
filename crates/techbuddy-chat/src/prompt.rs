//! System prompt construction.

use chrono::{DateTime, Utc};
use techbuddy_core::Personality;

const LISTING_RULES: &str = "When providing product listings:
1. Always include detailed descriptions
2. Use clear separators between product name and description (use '-' or ':')
3. Break down features with proper punctuation
4. Include price if available
5. List at least 3 options when comparing products
6. Format specifications in clear, separate points

Example format:
1. Product Name - Main description. Feature one. Feature two. Feature three.
2. Product Name - Main description. Feature one. Feature two. Feature three.";

/// Render the session's system prompt for `personality` at time `now`.
pub fn build_system_prompt(personality: &Personality, now: DateTime<Utc>) -> String {
    let mut prompt = format!(
        "You are {}, a {} chatbot specialized in {}.\nYour role: {}.\nCurrent time: {} UTC\n",
        personality.name,
        personality.tone,
        personality.expertise,
        personality.role.replace('_', " "),
        now.format("%Y-%m-%d %H:%M:%S"),
    );
    if !personality.user_name.is_empty() {
        prompt.push_str(&format!("Current user: {}\n", personality.user_name));
    }
    prompt.push('\n');
    prompt.push_str(LISTING_RULES);
    prompt.push_str(
        "\n\nYour goal is to provide helpful, accurate, and efficient support while maintaining a consistent personality.",
    );
    prompt
}
