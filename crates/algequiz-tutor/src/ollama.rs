//! Ollama (local LLM) tutor provider.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use algequiz_core::traits::{
    clean_feedback, FeedbackRequest, FeedbackResponse, TutorProvider,
};

use crate::error::TutorError;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const SYSTEM_PROMPT: &str = "You are an expert math tutor.";

/// Ollama local LLM tutor provider.
pub struct OllamaTutor {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaTutor {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Build a provider with an explicit request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base.to_string(),
            timeout,
            client,
        }
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f64,
    num_predict: u32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: OllamaResponseMessage,
    #[serde(default)]
    model: String,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

#[async_trait]
impl TutorProvider for OllamaTutor {
    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn request_feedback(
        &self,
        request: &FeedbackRequest,
    ) -> anyhow::Result<FeedbackResponse> {
        let start = Instant::now();

        let system_prompt = request
            .system_prompt
            .clone()
            .unwrap_or_else(|| SYSTEM_PROMPT.to_string());

        let body = OllamaRequest {
            model: request.model.clone(),
            messages: vec![
                OllamaMessage {
                    role: "system".to_string(),
                    content: system_prompt,
                },
                OllamaMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TutorError::Timeout(self.timeout.as_secs())
                } else {
                    TutorError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(TutorError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let api_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| TutorError::MalformedResponse(e.to_string()))?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let content = api_response.message.content;
        let cleaned = clean_feedback(&content);

        Ok(FeedbackResponse {
            content,
            cleaned,
            model: api_response.model,
            latency_ms,
        })
    }
}
