//! The contract between the session flow and the remote interview API.
//!
//! The `InterviewApi` trait is the collaborator seam: the flow depends on
//! this abstraction rather than a concrete HTTP client, so unit tests can
//! drive it with `mockall`'s `MockInterviewApi` instead of a live server.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::model::{Answer, Session, SessionStatus};

/// Errors from the remote API, already classified at the transport seam.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection failure, timeout, or other transport-level problem.
    #[error("network error: {0}")]
    Transport(String),
    /// Non-2xx response; `detail` carries the server's error envelope.
    #[error("server returned {code}: {detail}")]
    Status { code: u16, detail: String },
    /// The response body did not match the expected shape.
    #[error("failed to decode server response: {0}")]
    Decode(String),
    /// Missing or rejected bearer token.
    #[error("not authenticated")]
    Unauthorized,
}

impl ApiError {
    /// Whether retrying the same request can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ApiError::Unauthorized)
    }
}

/// Body of `POST /interview/answer`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AnswerRequest {
    pub question_id: i64,
    pub user_audio_text: String,
    pub response_time_ms: u64,
    pub edit_count: u32,
}

/// Body of `POST /interview/{id}/complete`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CompleteRequest {
    pub status: SessionStatus,
    /// Accumulated elapsed seconds measured client-side.
    pub total_duration: i64,
}

/// Acknowledgement of a completion request.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CompleteAck {
    pub status: String,
    #[serde(default)]
    pub final_score: Option<u32>,
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait InterviewApi {
    /// `GET /interview/{id}`.
    async fn fetch_session(&self, session_id: i64) -> Result<Session, ApiError>;

    /// `POST /interview/start`; the server generates the question list.
    async fn start_session(&self) -> Result<Session, ApiError>;

    /// `GET /interview/my-sessions`, newest first.
    async fn my_sessions(&self) -> Result<Vec<Session>, ApiError>;

    /// `POST /interview/answer`; returns the stored answer with embedded
    /// feedback.
    async fn submit_answer(&self, request: AnswerRequest) -> Result<Answer, ApiError>;

    /// `POST /interview/{id}/complete`.
    async fn complete_session(
        &self,
        session_id: i64,
        request: CompleteRequest,
    ) -> Result<CompleteAck, ApiError>;
}
