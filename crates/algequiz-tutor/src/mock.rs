//! Mock tutor provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use algequiz_core::traits::{
    clean_feedback, FeedbackRequest, FeedbackResponse, TutorProvider,
};

/// A mock tutor for exercising the session flow without a live endpoint.
///
/// Returns configurable responses based on prompt content matching.
pub struct MockTutor {
    /// Map of prompt substring -> canned response text.
    responses: HashMap<String, String>,
    /// Default response if no prompt matches.
    default_response: String,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<FeedbackRequest>>,
}

impl MockTutor {
    /// Create a new mock with the given prompt->response mappings.
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_response: "Keep practicing.".to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            responses: HashMap::new(),
            default_response: response.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<FeedbackRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl TutorProvider for MockTutor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn request_feedback(
        &self,
        request: &FeedbackRequest,
    ) -> anyhow::Result<FeedbackResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let content = self
            .responses
            .iter()
            .find(|(key, _)| request.prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        let cleaned = clean_feedback(&content);

        Ok(FeedbackResponse {
            content,
            cleaned,
            model: request.model.clone(),
            latency_ms: 1,
        })
    }
}
