use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::ExposeSecret;

use neurovisa_core::api::{AnswerRequest, ApiError, CompleteAck, CompleteRequest, InterviewApi};
use neurovisa_core::model::{Answer, Session};

use crate::config::Config;

// FastAPI wraps every error body in {"detail": ...}; detail is usually a
// string but validation errors ship an array.
#[derive(serde::Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) detail: serde_json::Value,
}

pub(crate) fn detail_text(detail: serde_json::Value) -> String {
    match detail {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

pub(crate) fn transport(e: reqwest::Error) -> ApiError {
    if e.is_decode() {
        ApiError::Decode(e.to_string())
    } else {
        ApiError::Transport(e.to_string())
    }
}

/// Classify a non-2xx response, consuming the body for the error envelope.
pub(crate) async fn check(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    let detail = match resp.json::<ErrorEnvelope>().await {
        Ok(envelope) => detail_text(envelope.detail),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(ApiError::Status {
        code: status.as_u16(),
        detail,
    })
}

/// Authenticated client for the interview endpoints.
pub struct InterviewClient {
    http: Client,
    config: Config,
}

impl InterviewClient {
    pub fn new(config: Config) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");
        let resp = self
            .http
            .get(self.url(path))
            .bearer_auth(self.config.token().expose_secret())
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?.json::<T>().await.map_err(transport)
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "POST");
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(self.config.token().expose_secret())
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?.json::<T>().await.map_err(transport)
    }
}

#[async_trait]
impl InterviewApi for InterviewClient {
    async fn fetch_session(&self, session_id: i64) -> Result<Session, ApiError> {
        self.get_json(&format!("/interview/{session_id}")).await
    }

    async fn start_session(&self) -> Result<Session, ApiError> {
        self.post_json("/interview/start", &serde_json::json!({}))
            .await
    }

    async fn my_sessions(&self) -> Result<Vec<Session>, ApiError> {
        self.get_json("/interview/my-sessions").await
    }

    async fn submit_answer(&self, request: AnswerRequest) -> Result<Answer, ApiError> {
        self.post_json("/interview/answer", &request).await
    }

    async fn complete_session(
        &self,
        session_id: i64,
        request: CompleteRequest,
    ) -> Result<CompleteAck, ApiError> {
        self.post_json(&format!("/interview/{session_id}/complete"), &request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_passes_through() {
        let envelope: ErrorEnvelope =
            serde_json::from_str(r#"{"detail": "Session not found"}"#).unwrap();
        assert_eq!(detail_text(envelope.detail), "Session not found");
    }

    #[test]
    fn structured_detail_is_stringified() {
        let envelope: ErrorEnvelope = serde_json::from_str(
            r#"{"detail": [{"loc": ["body", "question_id"], "msg": "field required"}]}"#,
        )
        .unwrap();
        let text = detail_text(envelope.detail);
        assert!(text.contains("field required"));
    }

    // Live smoke test against a locally running backend. Run with:
    //   NEUROVISA_TOKEN=... cargo test -p neurovisa-api -- --ignored
    #[tokio::test]
    #[ignore]
    async fn live_my_sessions() {
        let token = std::env::var("NEUROVISA_TOKEN").expect("NEUROVISA_TOKEN not set");
        let config = Config::builder().with_token(token.into()).build();
        let client = InterviewClient::new(config);
        let sessions = client.my_sessions().await.expect("my-sessions failed");
        println!("{} sessions", sessions.len());
    }
}
