//! Core trait definition for tutor endpoints.
//!
//! The async trait is implemented by the `algequiz-tutor` crate for each
//! supported endpoint flavor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tutor provider trait
// ---------------------------------------------------------------------------

/// Trait for chat-completion backends that produce tutoring feedback.
#[async_trait]
pub trait TutorProvider: Send + Sync {
    /// Human-readable provider name (e.g. "lmstudio").
    fn name(&self) -> &str;

    /// Request free-text feedback for a prompt.
    ///
    /// Single attempt, no retries: a failure is returned to the caller, which
    /// decides how to display it.
    async fn request_feedback(&self, request: &FeedbackRequest)
        -> anyhow::Result<FeedbackResponse>;
}

/// Request for tutoring feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    /// Model identifier (e.g. "qwen3-30b-a3b").
    pub model: String,
    /// The user-turn prompt built from the session outcome.
    pub prompt: String,
    /// Optional system prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Output-length cap in tokens.
    pub max_tokens: u32,
}

/// Response from a tutoring feedback request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    /// The raw response content.
    pub content: String,
    /// Content with reasoning blocks and markup characters removed.
    pub cleaned: String,
    /// Model that actually produced the response.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

// ---------------------------------------------------------------------------
// Default system prompt
// ---------------------------------------------------------------------------

/// Default system prompt for tutor providers.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert math tutor.";

// ---------------------------------------------------------------------------
// Response cleanup
// ---------------------------------------------------------------------------

/// Clean a raw tutor response for display.
///
/// Handles:
/// - `<think>...</think>` reasoning blocks (non-greedy, spanning newlines);
///   an opening marker without a closing one is left in place
/// - markup characters `\ $ * # [ ]`, stripped everywhere
/// - leading/trailing whitespace
pub fn clean_feedback(raw: &str) -> String {
    const OPEN: &str = "<think>";
    const CLOSE: &str = "</think>";

    let mut text = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find(OPEN) {
        match rest[start + OPEN.len()..].find(CLOSE) {
            Some(end) => {
                text.push_str(&rest[..start]);
                rest = &rest[start + OPEN.len() + end + CLOSE.len()..];
            }
            None => break,
        }
    }
    text.push_str(rest);

    text.retain(|c| !matches!(c, '\\' | '$' | '*' | '#' | '[' | ']'));
    text.trim().to_string()
}
