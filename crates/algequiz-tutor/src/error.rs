//! Tutor provider error types.

use thiserror::Error;

/// Errors that can occur when talking to a tutor endpoint.
///
/// Feedback is requested once per session with no retries; each variant is
/// surfaced to the caller, which decides how to display it.
#[derive(Debug, Error)]
pub enum TutorError {
    /// The endpoint returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
