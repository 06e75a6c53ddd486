//! OpenAI-compatible chat-completion provider.
//!
//! Speaks the `/v1/chat/completions` dialect used by LM Studio and other
//! OpenAI-compatible local servers; the reference deployment is LM Studio
//! on localhost.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use algequiz_core::traits::{
    clean_feedback, FeedbackRequest, FeedbackResponse, TutorProvider,
};

use crate::error::TutorError;

const DEFAULT_BASE_URL: &str = "http://localhost:1234";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const SYSTEM_PROMPT: &str = "You are an expert math tutor.";

/// OpenAI-compatible tutor provider.
pub struct OpenAiTutor {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiTutor {
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Self {
        Self::with_timeout(base_url, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Build a provider with an explicit request timeout.
    pub fn with_timeout(
        base_url: Option<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            timeout,
            client,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    model: String,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl TutorProvider for OpenAiTutor {
    fn name(&self) -> &str {
        "openai"
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

        let body = ChatRequest {
            model: request.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut req = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("content-type", "application/json");

        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }

        let response = req.json(&body).send().await.map_err(|e| {
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

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| TutorError::MalformedResponse(e.to_string()))?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let content = api_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| TutorError::MalformedResponse("no choices in response".into()))?;
        let cleaned = clean_feedback(&content);

        Ok(FeedbackResponse {
            content,
            cleaned,
            model: api_response.model,
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_request() -> FeedbackRequest {
        FeedbackRequest {
            model: "qwen3-30b-a3b".into(),
            prompt: "Every answer was correct.".into(),
            system_prompt: None,
            temperature: 0.5,
            max_tokens: 768,
        }
    }

    #[tokio::test]
    async fn successful_feedback() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "choices": [{"message": {"content": "Well done! Try harder exercises next.", "role": "assistant"}, "index": 0}],
            "model": "qwen3-30b-a3b"
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider = OpenAiTutor::new(Some(server.uri()), None);
        let response = provider.request_feedback(&make_request()).await.unwrap();
        assert!(response.content.contains("Well done"));
        assert_eq!(response.model, "qwen3-30b-a3b");
    }

    #[tokio::test]
    async fn think_block_is_cleaned() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "choices": [{"message": {"content": "<think>\nscore is perfect\n</think>\n**Great** work!", "role": "assistant"}, "index": 0}],
            "model": "qwen3-30b-a3b"
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider = OpenAiTutor::new(Some(server.uri()), None);
        let response = provider.request_feedback(&make_request()).await.unwrap();
        assert!(response.content.contains("<think>"));
        assert_eq!(response.cleaned, "Great work!");
    }

    #[tokio::test]
    async fn bearer_header_sent_when_key_configured() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "choices": [{"message": {"content": "ok", "role": "assistant"}, "index": 0}],
            "model": "m"
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider = OpenAiTutor::new(Some(server.uri()), Some("test-key".into()));
        let response = provider.request_feedback(&make_request()).await.unwrap();
        assert_eq!(response.content, "ok");
    }

    #[tokio::test]
    async fn error_response_is_reported_not_raised() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let provider = OpenAiTutor::new(Some(server.uri()), None);
        let err = provider.request_feedback(&make_request()).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = OpenAiTutor::new(Some(server.uri()), None);
        let err = provider.request_feedback(&make_request()).await.unwrap_err();
        assert!(err.to_string().contains("malformed response"));
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({"choices": [], "model": "m"});

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider = OpenAiTutor::new(Some(server.uri()), None);
        let err = provider.request_feedback(&make_request()).await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
